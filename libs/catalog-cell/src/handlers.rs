// libs/catalog-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::CatalogError;
use crate::services::catalog::CatalogService;

#[axum::debug_handler]
pub async fn list_specialties(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);

    let specialties = catalog.list_specialties().await.map_err(map_catalog_error)?;

    Ok(Json(json!(specialties)))
}

#[axum::debug_handler]
pub async fn list_cities(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);

    let cities = catalog.list_cities().await.map_err(map_catalog_error)?;

    Ok(Json(json!(cities)))
}

#[axum::debug_handler]
pub async fn get_doctor_locations(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);

    let locations = catalog
        .locations_for(doctor_id)
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!(locations)))
}

fn map_catalog_error(e: CatalogError) -> AppError {
    match e {
        CatalogError::StoreUnavailable => {
            AppError::Unavailable("reference data store unreachable".to_string())
        }
        CatalogError::Database(msg) => AppError::Database(msg),
    }
}
