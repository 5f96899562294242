// libs/doctor-cell/src/models.rs
use serde::{Deserialize, Serialize};

/// Hard cap on a search result set. Bounds the fan-out into the rating and
/// availability enrichment calls the directory page makes per result row.
pub const MAX_SEARCH_RESULTS: usize = 100;

/// A doctor row as provisioned. Never mutated by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub specialty_id: i64,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A directory search result row, with the specialty resolved to its
/// display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Optional predicates, combined as a conjunction. An absent field imposes
/// no filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorSearchQuery {
    pub specialty_id: Option<i64>,
    pub city: Option<String>,
    pub q: Option<String>,
}

// Internal row shapes for store reads.

#[derive(Debug, Deserialize)]
pub struct SpecialtyName {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationId {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DoctorLink {
    pub doctor_id: i64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor store unreachable")]
    StoreUnavailable,

    #[error("Database error: {0}")]
    Database(String),
}
