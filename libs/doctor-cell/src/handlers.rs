// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{DoctorError, DoctorSearchQuery};
use crate::services::search::DoctorSearchService;

#[axum::debug_handler]
pub async fn search_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let search_service = DoctorSearchService::new(&state);

    let doctors = search_service.search(&query).await.map_err(|e| match e {
        DoctorError::StoreUnavailable => {
            AppError::Unavailable("doctor store unreachable".to_string())
        }
        DoctorError::Database(msg) => AppError::Database(msg),
    })?;

    Ok(Json(json!(doctors)))
}
