// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire cap for an upcoming-slots listing.
pub const UPCOMING_SLOTS_LIMIT: i64 = 50;

/// One appointment opportunity: fixed start, fixed duration, one doctor.
///
/// `is_booked` is monotone: it moves from false to true exactly once, via
/// the booking transition, and nothing un-books a slot afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub id: i64,
    pub doctor_id: i64,
    pub start_time: DateTime<Utc>,
    pub duration_min: i32,
    pub is_booked: bool,
}

/// Snapshot returned to the caller who won the slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub id: i64,
    pub doctor_id: i64,
    pub start_time: DateTime<Utc>,
    pub duration_min: i32,
}

impl From<AppointmentSlot> for BookingConfirmation {
    fn from(slot: AppointmentSlot) -> Self {
        Self {
            id: slot.id,
            doctor_id: slot.doctor_id,
            start_time: slot.start_time,
            duration_min: slot.duration_min,
        }
    }
}

/// `slot_id` is optional so that an absent field reaches the handler and
/// maps to a clean bad-request response instead of a body-rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSlotRequest {
    pub slot_id: Option<i64>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SlotError {
    #[error("Slot not found")]
    NotFound,

    #[error("Slot already booked")]
    AlreadyBooked,

    #[error("Slot store unreachable")]
    StoreUnavailable,

    #[error("Database error: {0}")]
    Database(String),
}
