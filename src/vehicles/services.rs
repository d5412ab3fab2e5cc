use axum::http::StatusCode;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    error::ApiError,
    state::AppState,
    vehicles::{
        dto::{ImageQueryResponse, PlateQueryResponse, VehicleRequest, VehicleView},
        plate,
        repo::RegisterOutcome,
        repo_types::Vehicle,
    },
};
use crate::auth::repo_types::User;

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Registers a new vehicle after validation, ensuring a placeholder owner
/// identity exists when the username is unknown.
pub fn register_vehicle(state: &AppState, request: &VehicleRequest) -> Result<Vehicle, ApiError> {
    let username = required(&request.username).ok_or(ApiError::UsernameRequired)?;
    let license_number = plate::normalize_valid(request.license_number.as_deref().unwrap_or(""))
        .ok_or(ApiError::InvalidLicense)?;

    let (Some(make), Some(model), Some(year)) = (
        required(&request.make),
        required(&request.model),
        required(&request.year),
    ) else {
        return Err(ApiError::VehicleDetailsRequired);
    };

    if state.vehicles.find_by_plate(&license_number).is_some() {
        return Err(ApiError::LicenseExists);
    }

    // Associate the vehicle with a placeholder identity when the owner has
    // never registered.
    if state.users.find_by_email(username).is_none() {
        let placeholder = User::new(&username.to_lowercase(), &username.to_lowercase(), username, "");
        state.users.create(placeholder);
        info!(username = %username.to_lowercase(), "created placeholder owner identity");
    }

    let vehicle = Vehicle {
        username: username.to_lowercase(),
        license_number,
        make: make.to_string(),
        model: model.to_string(),
        year: year.to_string(),
        blacklisted: false,
        created_at: OffsetDateTime::now_utc(),
    };

    match state.vehicles.register(vehicle) {
        RegisterOutcome::Created(vehicle) => {
            info!(username = %vehicle.username, license = %vehicle.license_number, "vehicle registered");
            Ok(vehicle)
        }
        RegisterOutcome::LicenseExists => Err(ApiError::LicenseExists),
    }
}

/// Administrator list view: every vehicle paired with its owner identity.
pub fn list_all_with_owners(state: &AppState) -> Vec<VehicleView> {
    state
        .vehicles
        .all()
        .into_iter()
        .map(|vehicle| {
            let owner = state.users.find_by_email(&vehicle.username);
            VehicleView::from(vehicle, owner)
        })
        .collect()
}

/// Public blacklist/existence query. Absent plates report
/// `found:false, blacklisted:false`; invalid input is the only error.
pub fn query_by_plate(state: &AppState, raw: &str) -> Result<PlateQueryResponse, ApiError> {
    let license_number = plate::normalize_valid(raw).ok_or(ApiError::InvalidLicense)?;

    Ok(match state.vehicles.find_by_plate(&license_number) {
        Some(vehicle) => PlateQueryResponse {
            found: true,
            license_number: vehicle.license_number,
            blacklisted: vehicle.blacklisted,
        },
        None => PlateQueryResponse {
            found: false,
            license_number,
            blacklisted: false,
        },
    })
}

/// Image-driven query: forwards the upload to the recognition collaborator
/// and checks the resolved plate against the registry. Recognizer failures
/// are a soft negative, never an error. No store lock is held while the
/// recognition call is in flight.
pub async fn analyze_plate_image(
    state: &AppState,
    content_type: Option<&str>,
    body: Bytes,
) -> (StatusCode, ImageQueryResponse) {
    let is_image = content_type
        .map(|ct| ct.to_lowercase().starts_with("image/"))
        .unwrap_or(false);
    if !is_image {
        return (
            StatusCode::BAD_REQUEST,
            ImageQueryResponse::rejected("Please upload a valid image file."),
        );
    }
    if body.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            ImageQueryResponse::rejected("Image data is required."),
        );
    }

    let content_type = content_type.unwrap_or("application/octet-stream").to_string();
    let reply = match state.recognizer.recognize(body, &content_type).await {
        Ok(reply) => reply,
        Err(error) => {
            warn!(error = %error, "plate recognition unavailable");
            return (StatusCode::OK, ImageQueryResponse::unable_to_analyze());
        }
    };

    if !reply.success {
        return (StatusCode::OK, ImageQueryResponse::unable_to_analyze());
    }

    let normalized = plate::normalize(reply.plate.as_deref().unwrap_or(""));
    if normalized.is_empty() {
        return (StatusCode::OK, ImageQueryResponse::no_readable_plate());
    }

    let matched = state.vehicles.find_by_plate(&normalized);
    let found_in_system = matched.is_some();
    let blacklisted = matched.map(|v| v.blacklisted).unwrap_or(false);
    (
        StatusCode::OK,
        ImageQueryResponse::detected(normalized, found_in_system, blacklisted),
    )
}
