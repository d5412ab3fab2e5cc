use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    vehicles::{
        dto::{
            AdminVehicleList, BlacklistResponse, ListParams, PlateQueryResponse, QueryParams,
            VehicleRequest,
        },
        plate,
        repo_types::Vehicle,
        services,
    },
};

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Returns the caller's vehicles or, for the administrator, every vehicle
/// with owner details.
#[instrument(skip(state))]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let username = required(&params.username).ok_or(ApiError::UsernameRequired)?;

    if state.users.is_admin(username) {
        let vehicles = services::list_all_with_owners(&state);
        return Ok(Json(AdminVehicleList { vehicles }).into_response());
    }

    let vehicles = state.vehicles.find_by_username(username);
    Ok(Json(vehicles).into_response())
}

#[instrument(skip(state, payload))]
pub async fn register_vehicle(
    State(state): State<AppState>,
    Json(payload): Json<VehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), ApiError> {
    let vehicle = services::register_vehicle(&state, &payload)?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Deletes a registration. The administrator removes by plate across all
/// owners; everyone else only their own vehicles, with misses reported as
/// not-found either way.
#[instrument(skip(state, payload))]
pub async fn remove_vehicle(
    State(state): State<AppState>,
    Json(payload): Json<VehicleRequest>,
) -> Result<StatusCode, ApiError> {
    let (Some(username), Some(raw)) = (required(&payload.username), required(&payload.license_number))
    else {
        return Err(ApiError::UsernameAndLicenseRequired);
    };
    let license = plate::normalize_valid(raw).ok_or(ApiError::InvalidLicense)?;

    let removed = if state.users.is_admin(username) {
        state.vehicles.remove_by_plate(&license)
    } else {
        state.vehicles.remove(username, &license)
    };
    if !removed {
        return Err(ApiError::NotFound);
    }

    info!(username = %username, license = %license, "vehicle removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Updates the blacklist flag for a plate. Administrator only.
#[instrument(skip(state, payload))]
pub async fn update_blacklist(
    State(state): State<AppState>,
    Json(payload): Json<VehicleRequest>,
) -> Result<Json<BlacklistResponse>, ApiError> {
    let (Some(username), Some(raw)) = (required(&payload.username), required(&payload.license_number))
    else {
        return Err(ApiError::UsernameAndLicenseRequired);
    };

    if !state.users.is_admin(username) {
        warn!(username = %username, "blacklist update rejected for non-admin");
        return Err(ApiError::AdminOnly);
    }

    let license = plate::normalize_valid(raw).ok_or(ApiError::InvalidLicense)?;
    let vehicle = state
        .vehicles
        .update_blacklist_status(&license, payload.blacklisted)
        .ok_or(ApiError::NotFound)?;

    info!(license = %vehicle.license_number, blacklisted = vehicle.blacklisted, "blacklist updated");
    Ok(Json(BlacklistResponse {
        license_number: vehicle.license_number,
        blacklisted: vehicle.blacklisted,
    }))
}

/// Public, unauthenticated existence/blacklist query.
#[instrument(skip(state))]
pub async fn query_plate(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<PlateQueryResponse>, ApiError> {
    let raw = params.license.as_deref().unwrap_or("");
    Ok(Json(services::query_by_plate(&state, raw)?))
}

/// Accepts an image upload, forwards it to the recognition service and
/// reports whether the detected plate is registered/blacklisted.
#[instrument(skip(state, headers, body))]
pub async fn query_plate_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let (status, response) = services::analyze_plate_image(&state, content_type, body).await;
    (status, Json(response)).into_response()
}
