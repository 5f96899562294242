use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::slot_routes;
use catalog_cell::router::catalog_routes;
use doctor_cell::router::doctor_routes;
use rating_cell::router::rating_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let api = Router::new()
        .merge(catalog_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(slot_routes(state.clone()))
        .merge(rating_routes(state));

    Router::new()
        .route("/", get(|| async { "QuickDoc API is running!" }))
        .nest("/api", api)
}
