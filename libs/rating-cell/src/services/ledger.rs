// libs/rating-cell/src/services/ledger.rs
use std::collections::HashMap;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{is_unavailable, SupabaseClient};

use crate::models::{
    Rating, RatingAggregate, RatingError, ScoreRow, SubmitRatingRequest, DEFAULT_AUTHOR_NAME,
    MAX_COMMENT_CHARS,
};

/// Append-only rating ledger with on-read aggregation.
///
/// Aggregates are recomputed from the ledger on every read, so they can
/// never drift from the rows. Full-scan-per-read is fine at directory
/// scale; a production redesign would maintain a transactional counter/sum.
pub struct RatingLedgerService {
    supabase: SupabaseClient,
}

impl RatingLedgerService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Append one rating and return the doctor's fresh aggregate.
    ///
    /// Out-of-range scores are rejected outright, never clamped. Over-long
    /// comments are silently cut to 500 characters.
    pub async fn submit(
        &self,
        doctor_id: i64,
        request: SubmitRatingRequest,
    ) -> Result<RatingAggregate, RatingError> {
        if !(1..=5).contains(&request.score) {
            return Err(RatingError::InvalidScore(request.score));
        }

        self.verify_doctor_exists(doctor_id).await?;

        let comment = request
            .comment
            .map(|c| c.chars().take(MAX_COMMENT_CHARS).collect::<String>());

        let author_name = request
            .author_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string());

        let rating_data = json!({
            "doctor_id": doctor_id,
            "score": request.score,
            "comment": comment,
            "author_name": author_name,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let created: Vec<Value> = self
            .supabase
            .request_with_headers(Method::POST, "/rest/v1/ratings", Some(rating_data), Some(headers))
            .await
            .map_err(store_error)?;

        if created.is_empty() {
            return Err(RatingError::Database(
                "Failed to append rating".to_string(),
            ));
        }

        info!("Rating appended for doctor {}", doctor_id);
        self.aggregate_for(doctor_id).await
    }

    /// Fresh (average, count) for one doctor; the empty sentinel when the
    /// ledger holds nothing for them.
    pub async fn aggregate_for(&self, doctor_id: i64) -> Result<RatingAggregate, RatingError> {
        debug!("Computing rating aggregate for doctor {}", doctor_id);

        let rows: Vec<ScoreRow> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/ratings?doctor_id=eq.{}&select=doctor_id,score",
                    doctor_id
                ),
                None,
            )
            .await
            .map_err(store_error)?;

        Ok(aggregate_scores(rows.iter().map(|r| r.score)))
    }

    /// Batch aggregates in one bulk read; every requested id gets an entry,
    /// unrated doctors get the empty sentinel. One store round-trip no
    /// matter how many ids, so the directory page's enrichment cost stays
    /// bounded under pagination.
    pub async fn aggregates_for(
        &self,
        doctor_ids: &[i64],
    ) -> Result<HashMap<i64, RatingAggregate>, RatingError> {
        debug!("Computing rating aggregates for {} doctors", doctor_ids.len());

        if doctor_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let id_list = doctor_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let rows: Vec<ScoreRow> = self
            .supabase
            .request(
                Method::GET,
                &format!(
                    "/rest/v1/ratings?doctor_id=in.({})&select=doctor_id,score",
                    id_list
                ),
                None,
            )
            .await
            .map_err(store_error)?;

        let mut scores_by_doctor: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in rows {
            scores_by_doctor.entry(row.doctor_id).or_default().push(row.score);
        }

        let aggregates = doctor_ids
            .iter()
            .map(|&id| {
                let aggregate = scores_by_doctor
                    .get(&id)
                    .map(|scores| aggregate_scores(scores.iter().copied()))
                    .unwrap_or_else(RatingAggregate::empty);
                (id, aggregate)
            })
            .collect();

        Ok(aggregates)
    }

    /// Most recent ratings, newest first.
    pub async fn list_for(&self, doctor_id: i64, limit: i64) -> Result<Vec<Rating>, RatingError> {
        debug!("Listing recent ratings for doctor {}", doctor_id);

        let path = format!(
            "/rest/v1/ratings?doctor_id=eq.{}&order=created_at.desc&limit={}",
            doctor_id, limit
        );

        let ratings: Vec<Rating> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(store_error)?;

        Ok(ratings)
    }

    async fn verify_doctor_exists(&self, doctor_id: i64) -> Result<(), RatingError> {
        let result: Vec<Value> = self
            .supabase
            .request(
                Method::GET,
                &format!("/rest/v1/doctors?id=eq.{}&select=id", doctor_id),
                None,
            )
            .await
            .map_err(store_error)?;

        if result.is_empty() {
            return Err(RatingError::DoctorNotFound);
        }

        Ok(())
    }
}

/// Average rounded to 2 decimals; the empty sentinel for zero scores.
fn aggregate_scores(scores: impl Iterator<Item = i64>) -> RatingAggregate {
    let mut sum = 0i64;
    let mut count = 0i64;
    for score in scores {
        sum += score;
        count += 1;
    }

    if count == 0 {
        return RatingAggregate::empty();
    }

    let average = (sum as f64 / count as f64 * 100.0).round() / 100.0;
    RatingAggregate {
        average: Some(average),
        count,
    }
}

fn store_error(e: anyhow::Error) -> RatingError {
    if is_unavailable(&e) {
        RatingError::StoreUnavailable
    } else {
        RatingError::Database(e.to_string())
    }
}
