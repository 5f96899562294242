// libs/appointment-cell/src/services/booking.rs
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{AppointmentSlot, BookingConfirmation, SlotError};
use crate::services::availability::store_error;

/// Owns the one legal state transition of a slot: free → booked.
///
/// There is no release, cancellation or timeout path; booked is terminal.
pub struct SlotBookingService {
    supabase: SupabaseClient,
}

impl SlotBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Attempt the free→booked transition for `slot_id`.
    ///
    /// The `is_booked=is.false` filter travels with the update in a single
    /// statement, which the store executes atomically against the row. Of
    /// any number of concurrent callers, at most one gets a row back; there
    /// is no separate read-then-write window to race through.
    pub async fn book(&self, slot_id: i64) -> Result<BookingConfirmation, SlotError> {
        debug!("Booking slot {}", slot_id);

        let path = format!(
            "/rest/v1/appointment_slots?id=eq.{}&is_booked=is.false",
            slot_id
        );

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let updated: Vec<AppointmentSlot> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({ "is_booked": true })),
                Some(headers),
            )
            .await
            .map_err(store_error)?;

        if let Some(slot) = updated.into_iter().next() {
            info!("Slot {} booked for doctor {}", slot.id, slot.doctor_id);
            return Ok(slot.into());
        }

        // No row matched the conditional update: the slot is either missing
        // or was taken first. A lost race and a stale client both surface
        // as the same conflict signal.
        let existing: Vec<AppointmentSlot> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/appointment_slots?id=eq.{}", slot_id),
                None,
            )
            .await
            .map_err(store_error)?;

        if existing.is_empty() {
            Err(SlotError::NotFound)
        } else {
            debug!("Slot {} already booked", slot_id);
            Err(SlotError::AlreadyBooked)
        }
    }
}
