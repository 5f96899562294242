// libs/rating-cell/src/handlers.rs
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    RatingAggregate, RatingError, SubmitRatingRequest, MAX_STATS_BATCH, RECENT_RATINGS_LIMIT,
};
use crate::services::ledger::RatingLedgerService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub ids: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RatingsListQuery {
    pub limit: Option<i64>,
}

// ==============================================================================
// RATING HANDLERS
// ==============================================================================

/// Batch aggregates for the directory page, keyed by doctor id.
#[axum::debug_handler]
pub async fn get_rating_stats(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, AppError> {
    let ids_param = query
        .ids
        .ok_or_else(|| AppError::BadRequest("ids is required".to_string()))?;

    let doctor_ids = parse_id_list(&ids_param)?;

    let ledger = RatingLedgerService::new(&state);
    let aggregates = ledger
        .aggregates_for(&doctor_ids)
        .await
        .map_err(map_rating_error)?;

    let keyed: HashMap<String, RatingAggregate> = aggregates
        .into_iter()
        .map(|(id, aggregate)| (id.to_string(), aggregate))
        .collect();

    Ok(Json(json!(keyed)))
}

/// Aggregate plus the most recent ratings for one doctor.
#[axum::debug_handler]
pub async fn get_doctor_ratings(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<RatingsListQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = query.limit.unwrap_or(RECENT_RATINGS_LIMIT);

    let ledger = RatingLedgerService::new(&state);

    let aggregate = ledger
        .aggregate_for(doctor_id)
        .await
        .map_err(map_rating_error)?;
    let ratings = ledger
        .list_for(doctor_id, limit)
        .await
        .map_err(map_rating_error)?;

    Ok(Json(json!({
        "aggregate": aggregate,
        "ratings": ratings
    })))
}

#[axum::debug_handler]
pub async fn submit_rating(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
    Json(request): Json<SubmitRatingRequest>,
) -> Result<Json<Value>, AppError> {
    let ledger = RatingLedgerService::new(&state);

    let aggregate = ledger
        .submit(doctor_id, request)
        .await
        .map_err(map_rating_error)?;

    Ok(Json(json!({
        "success": true,
        "aggregate": aggregate
    })))
}

fn parse_id_list(raw: &str) -> Result<Vec<i64>, AppError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|_| {
                AppError::BadRequest("ids must be a comma-separated list of doctor ids".to_string())
            })
        })
        .collect::<Result<Vec<i64>, AppError>>()?;

    if ids.len() > MAX_STATS_BATCH {
        return Err(AppError::BadRequest(format!(
            "at most {} ids per stats request",
            MAX_STATS_BATCH
        )));
    }

    Ok(ids)
}

fn map_rating_error(e: RatingError) -> AppError {
    match e {
        RatingError::InvalidScore(score) => AppError::InvalidScore(format!(
            "score must be an integer between 1 and 5, got {}",
            score
        )),
        RatingError::DoctorNotFound => AppError::NotFound("doctor not found".to_string()),
        RatingError::StoreUnavailable => {
            AppError::Unavailable("rating store unreachable".to_string())
        }
        RatingError::Database(msg) => AppError::Database(msg),
    }
}
