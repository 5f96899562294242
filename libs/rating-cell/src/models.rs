// libs/rating-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comments longer than this are cut, not rejected. Defined policy of the
/// ledger, kept for wire compatibility.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Shown when a submitter leaves the author field blank.
pub const DEFAULT_AUTHOR_NAME: &str = "QuickDoc Nutzer:in";

/// Upper bound on one batch-stats request.
pub const MAX_STATS_BATCH: usize = 100;

/// Wire default for a recent-ratings listing.
pub const RECENT_RATINGS_LIMIT: i64 = 20;

/// One immutable ledger entry. Never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub doctor_id: i64,
    pub score: i64,
    pub comment: Option<String>,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

/// Derived on every read, never stored. `average` is `None` (`null` on the
/// wire) when the doctor has no ratings, so "no data" stays distinguishable
/// from a genuine 0.0 average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub average: Option<f64>,
    pub count: i64,
}

impl RatingAggregate {
    pub fn empty() -> Self {
        Self {
            average: None,
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRatingRequest {
    pub score: i64,
    pub comment: Option<String>,
    pub author_name: Option<String>,
}

// Internal row shapes for store reads.

#[derive(Debug, Deserialize)]
pub struct ScoreRow {
    pub doctor_id: i64,
    pub score: i64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RatingError {
    #[error("Score must be an integer between 1 and 5, got {0}")]
    InvalidScore(i64),

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Rating store unreachable")]
    StoreUnavailable,

    #[error("Database error: {0}")]
    Database(String),
}
