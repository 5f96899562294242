// libs/appointment-cell/src/services/availability.rs
use chrono::{DateTime, Utc};
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{is_unavailable, SupabaseClient};

use crate::models::{AppointmentSlot, SlotError};

/// Read side of the slot lifecycle. Both queries only consider slots with
/// `start_time >= from`; past slots never show up in availability views.
pub struct SlotAvailabilityService {
    supabase: SupabaseClient,
}

impl SlotAvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Upcoming slots for a doctor, booked ones included; the caller
    /// decides how to render taken slots. Empty vec for a doctor with none.
    pub async fn list_upcoming_slots(
        &self,
        doctor_id: i64,
        from: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<AppointmentSlot>, SlotError> {
        debug!("Listing upcoming slots for doctor {} from {}", doctor_id, from);

        let path = format!(
            "/rest/v1/appointment_slots?doctor_id=eq.{}&start_time=gte.{}&order=start_time.asc&limit={}",
            doctor_id,
            urlencoding::encode(&from.to_rfc3339()),
            limit
        );

        let slots: Vec<AppointmentSlot> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(store_error)?;

        Ok(slots)
    }

    /// The single earliest free slot at or after `from`, or `None`.
    pub async fn next_free_slot(
        &self,
        doctor_id: i64,
        from: DateTime<Utc>,
    ) -> Result<Option<AppointmentSlot>, SlotError> {
        debug!("Fetching next free slot for doctor {}", doctor_id);

        let path = format!(
            "/rest/v1/appointment_slots?doctor_id=eq.{}&is_booked=is.false&start_time=gte.{}&order=start_time.asc&limit=1",
            doctor_id,
            urlencoding::encode(&from.to_rfc3339())
        );

        let slots: Vec<AppointmentSlot> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(store_error)?;

        Ok(slots.into_iter().next())
    }
}

pub(crate) fn store_error(e: anyhow::Error) -> SlotError {
    if is_unavailable(&e) {
        SlotError::StoreUnavailable
    } else {
        SlotError::Database(e.to_string())
    }
}
