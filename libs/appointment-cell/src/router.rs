// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn slot_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/slots", get(handlers::list_slots))
        .route("/book", post(handlers::book_slot))
        .route("/doctors/{doctor_id}/next-slot", get(handlers::get_next_slot))
        .with_state(state)
}
