// libs/rating-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn rating_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/ratings/stats", get(handlers::get_rating_stats))
        .route(
            "/doctors/{doctor_id}/ratings",
            get(handlers::get_doctor_ratings).post(handlers::submit_rating),
        )
        .with_state(state)
}
