// libs/catalog-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/specialties", get(handlers::list_specialties))
        .route("/cities", get(handlers::list_cities))
        .route("/doctors/{doctor_id}/locations", get(handlers::get_doctor_locations))
        .with_state(state)
}
