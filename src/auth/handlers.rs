use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, PublicUser, RegisterRequest, UpdateContactRequest,
            UpdatePasswordRequest,
        },
        repo::CreateOutcome,
        repo_types::User,
        services::is_valid_email,
    },
    error::ApiError,
    state::AppState,
};

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> (StatusCode, Json<LoginResponse>) {
    if payload.identifier.trim().is_empty() || payload.password.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse::failure("Identifier and password are required")),
        );
    }

    let Some(user) = state
        .users
        .find_by_identifier_and_password(&payload.identifier, &payload.password)
    else {
        warn!(identifier = %payload.identifier, "login invalid credentials");
        return (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse::failure("Invalid credentials")),
        );
    };

    info!(username = %user.username, "user logged in");
    (
        StatusCode::OK,
        Json(LoginResponse {
            success: true,
            message: "Login successful".into(),
            username: Some(user.username),
            display_name: Some(user.display_name),
        }),
    )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidEmail);
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::PasswordTooShort);
    }
    if state.users.find_by_email(&payload.email).is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailExists);
    }

    let mut user = User::new(
        &payload.email,
        &payload.email,
        payload.display_name.trim(),
        &payload.password,
    );
    user.phone_country = payload.phone_country;
    user.phone = payload.phone;

    match state.users.create(user) {
        CreateOutcome::Created(user) => {
            info!(username = %user.username, "user registered");
            Ok((StatusCode::CREATED, Json(user.into())))
        }
        CreateOutcome::ProtectedIdentity(_) => {
            warn!(email = %payload.email, "attempt to register the protected identity");
            Err(ApiError::ProtectedIdentity)
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_contact(
    State(state): State<AppState>,
    Json(payload): Json<UpdateContactRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::UsernameRequired);
    }
    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::InvalidEmail);
    }

    let updated = state
        .users
        .update_contact(&payload.username, &email, payload.phone_country, payload.phone)
        .ok_or(ApiError::NotFound)?;
    info!(username = %updated.username, "contact details updated");
    Ok(Json(updated.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::UsernameRequired);
    }
    if payload.password.len() < 8 {
        return Err(ApiError::PasswordTooShort);
    }

    state
        .users
        .update_password(&payload.username, &payload.password)
        .ok_or(ApiError::NotFound)?;
    info!(username = %payload.username, "password updated");
    Ok(StatusCode::NO_CONTENT)
}
