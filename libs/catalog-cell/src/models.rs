// libs/catalog-cell/src/models.rs
use serde::{Deserialize, Serialize};

/// Immutable reference data: a medical specialty as provisioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// A practice location as shown on a doctor card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeLocation {
    pub city: String,
    pub zip: String,
    pub street: String,
}

// Internal row shapes for store reads.

#[derive(Debug, Deserialize)]
pub struct CityRow {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationLink {
    pub location_id: i64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Reference data store unreachable")]
    StoreUnavailable,

    #[error("Database error: {0}")]
    Database(String),
}
