use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod plate;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/vehicles",
            get(handlers::list_vehicles)
                .post(handlers::register_vehicle)
                .delete(handlers::remove_vehicle),
        )
        .route("/vehicles/blacklist", post(handlers::update_blacklist))
        .route("/vehicles/query", get(handlers::query_plate))
        .route(
            "/vehicles/query/image",
            post(handlers::query_plate_image).layer(DefaultBodyLimit::max(20 * 1024 * 1024)),
        )
}
