// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BookSlotRequest, SlotError, UPCOMING_SLOTS_LIMIT};
use crate::services::availability::SlotAvailabilityService;
use crate::services::booking::SlotBookingService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub doctor_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = query
        .doctor_id
        .ok_or_else(|| AppError::BadRequest("doctor_id is required".to_string()))?;

    let from = query.from.unwrap_or_else(Utc::now);

    let availability_service = SlotAvailabilityService::new(&state);
    let slots = availability_service
        .list_upcoming_slots(doctor_id, from, UPCOMING_SLOTS_LIMIT)
        .await
        .map_err(map_slot_error)?;

    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn get_next_slot(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let availability_service = SlotAvailabilityService::new(&state);

    let slot = availability_service
        .next_free_slot(doctor_id, Utc::now())
        .await
        .map_err(map_slot_error)?;

    // Serializes as `null` when the doctor has no free upcoming slot.
    Ok(Json(json!(slot)))
}

// ==============================================================================
// BOOKING HANDLER
// ==============================================================================

/// The externally visible "book appointment" use case: validate the payload,
/// run the exclusive transition, report success or conflict. No retries:
/// a conflicted caller re-queries the next free slot itself.
#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot_id = match request.slot_id {
        Some(id) if id > 0 => id,
        _ => return Err(AppError::BadRequest("slot_id is required".to_string())),
    };

    let booking_service = SlotBookingService::new(&state);
    let confirmation = booking_service.book(slot_id).await.map_err(map_slot_error)?;

    Ok(Json(json!({
        "success": true,
        "slot": confirmation
    })))
}

fn map_slot_error(e: SlotError) -> AppError {
    match e {
        SlotError::NotFound => AppError::NotFound("slot not found".to_string()),
        SlotError::AlreadyBooked => AppError::Conflict("slot already booked".to_string()),
        SlotError::StoreUnavailable => {
            AppError::Unavailable("slot store unreachable".to_string())
        }
        SlotError::Database(msg) => AppError::Database(msg),
    }
}
