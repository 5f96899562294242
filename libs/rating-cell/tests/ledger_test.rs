// libs/rating-cell/tests/ledger_test.rs
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rating_cell::handlers::{self, RatingsListQuery, StatsQuery};
use rating_cell::models::{RatingError, SubmitRatingRequest, DEFAULT_AUTHOR_NAME};
use rating_cell::services::ledger::RatingLedgerService;
use shared_config::AppConfig;
use shared_models::error::AppError;

fn test_config(url: &str) -> AppConfig {
    AppConfig {
        supabase_url: url.to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        port: 3000,
    }
}

fn score_rows(doctor_id: i64, scores: &[i64]) -> serde_json::Value {
    json!(scores
        .iter()
        .map(|s| json!({"doctor_id": doctor_id, "score": s}))
        .collect::<Vec<_>>())
}

fn rating_json(id: i64, doctor_id: i64, score: i64, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "doctor_id": doctor_id,
        "score": score,
        "comment": null,
        "author_name": DEFAULT_AUTHOR_NAME,
        "created_at": created_at
    })
}

async fn mock_doctor_exists(mock_server: &MockServer, doctor_id: i64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": doctor_id}])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_submit_returns_updated_aggregate() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    mock_doctor_exists(&mock_server, 7).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/ratings"))
        .and(header("Prefer", "return=representation"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([rating_json(1, 7, 3, "2026-08-01T12:00:00+00:00")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .and(query_param("select", "doctor_id,score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_rows(7, &[4, 5, 3])))
        .mount(&mock_server)
        .await;

    let ledger = RatingLedgerService::new(&config);
    let aggregate = ledger
        .submit(
            7,
            SubmitRatingRequest {
                score: 3,
                comment: None,
                author_name: None,
            },
        )
        .await
        .expect("submission should succeed");

    assert_eq!(aggregate.average, Some(4.0));
    assert_eq!(aggregate.count, 3);
}

#[tokio::test]
async fn test_out_of_range_scores_are_rejected() {
    // Validation fires before any store traffic; no mocks needed.
    let config = test_config("http://127.0.0.1:9");
    let ledger = RatingLedgerService::new(&config);

    for score in [0, 6, -1, 100] {
        let result = ledger
            .submit(
                7,
                SubmitRatingRequest {
                    score,
                    comment: None,
                    author_name: None,
                },
            )
            .await;

        assert_matches!(result, Err(RatingError::InvalidScore(s)) if s == score);
    }
}

#[tokio::test]
async fn test_boundary_scores_are_accepted() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    mock_doctor_exists(&mock_server, 7).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/ratings"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([rating_json(1, 7, 1, "2026-08-01T12:00:00+00:00")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_rows(7, &[1])))
        .mount(&mock_server)
        .await;

    let ledger = RatingLedgerService::new(&config);

    for score in [1, 5] {
        let result = ledger
            .submit(
                7,
                SubmitRatingRequest {
                    score,
                    comment: None,
                    author_name: None,
                },
            )
            .await;

        assert!(result.is_ok(), "score {} should be accepted", score);
    }
}

/// A 600-character comment is stored as exactly its first 500 characters;
/// truncation is the defined policy, not an error.
#[tokio::test]
async fn test_long_comment_is_truncated_to_500_chars() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    mock_doctor_exists(&mock_server, 7).await;

    let expected: String = "x".repeat(500);
    Mock::given(method("POST"))
        .and(path("/rest/v1/ratings"))
        .and(body_partial_json(json!({ "comment": expected })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([rating_json(1, 7, 4, "2026-08-01T12:00:00+00:00")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_rows(7, &[4])))
        .mount(&mock_server)
        .await;

    let ledger = RatingLedgerService::new(&config);
    let result = ledger
        .submit(
            7,
            SubmitRatingRequest {
                score: 4,
                comment: Some("x".repeat(600)),
                author_name: None,
            },
        )
        .await;

    assert!(result.is_ok(), "truncation must not error: {:?}", result.err());
}

#[tokio::test]
async fn test_blank_author_gets_placeholder() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    mock_doctor_exists(&mock_server, 7).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/ratings"))
        .and(body_partial_json(json!({ "author_name": DEFAULT_AUTHOR_NAME })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([rating_json(1, 7, 5, "2026-08-01T12:00:00+00:00")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_rows(7, &[5])))
        .mount(&mock_server)
        .await;

    let ledger = RatingLedgerService::new(&config);
    let result = ledger
        .submit(
            7,
            SubmitRatingRequest {
                score: 5,
                comment: None,
                author_name: Some("   ".to_string()),
            },
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_submit_for_unknown_doctor_is_not_found() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let ledger = RatingLedgerService::new(&config);
    let result = ledger
        .submit(
            999,
            SubmitRatingRequest {
                score: 4,
                comment: None,
                author_name: None,
            },
        )
        .await;

    assert_matches!(result, Err(RatingError::DoctorNotFound));
}

#[tokio::test]
async fn test_empty_ledger_yields_null_sentinel() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let ledger = RatingLedgerService::new(&config);
    let aggregate = ledger.aggregate_for(7).await.expect("read should succeed");

    // "no data" must stay distinguishable from a numeric 0.0 average.
    assert_eq!(aggregate.average, None);
    assert_eq!(aggregate.count, 0);
}

/// The batch form is one bulk read, not N sequential calls; the `.expect(1)`
/// on the mock is the assertion.
#[tokio::test]
async fn test_batch_aggregates_use_a_single_read() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    let mut rows: Vec<serde_json::Value> = vec![];
    rows.extend([json!({"doctor_id": 1, "score": 4}), json!({"doctor_id": 1, "score": 5})]);
    rows.push(json!({"doctor_id": 2, "score": 2}));

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .and(query_param("doctor_id", "in.(1,2,3)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(rows)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ledger = RatingLedgerService::new(&config);
    let aggregates = ledger
        .aggregates_for(&[1, 2, 3])
        .await
        .expect("batch read should succeed");

    assert_eq!(aggregates.len(), 3);
    assert_eq!(aggregates[&1].average, Some(4.5));
    assert_eq!(aggregates[&1].count, 2);
    assert_eq!(aggregates[&2].average, Some(2.0));
    // Unrated doctor still gets an entry, with the sentinel.
    assert_eq!(aggregates[&3].average, None);
    assert_eq!(aggregates[&3].count, 0);
}

#[tokio::test]
async fn test_list_for_returns_newest_first() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            rating_json(3, 7, 5, "2026-08-03T12:00:00+00:00"),
            rating_json(2, 7, 4, "2026-08-02T12:00:00+00:00"),
        ])))
        .mount(&mock_server)
        .await;

    let ledger = RatingLedgerService::new(&config);
    let ratings = ledger.list_for(7, 2).await.expect("listing should succeed");

    assert_eq!(ratings.len(), 2);
    assert!(ratings[0].created_at > ratings[1].created_at);
}

// ==============================================================================
// RATING HANDLERS
// ==============================================================================

#[tokio::test]
async fn test_stats_handler_requires_ids() {
    let config = Arc::new(test_config("http://127.0.0.1:9"));

    let result = handlers::get_rating_stats(State(config), Query(StatsQuery { ids: None })).await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_stats_handler_rejects_malformed_ids() {
    let config = Arc::new(test_config("http://127.0.0.1:9"));

    let result = handlers::get_rating_stats(
        State(config),
        Query(StatsQuery {
            ids: Some("1,abc,3".to_string()),
        }),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_submit_handler_maps_invalid_score() {
    let config = Arc::new(test_config("http://127.0.0.1:9"));

    let result = handlers::submit_rating(
        State(config),
        Path(7),
        Json(SubmitRatingRequest {
            score: 6,
            comment: None,
            author_name: None,
        }),
    )
    .await;

    assert_matches!(result, Err(AppError::InvalidScore(_)));
}

#[tokio::test]
async fn test_doctor_ratings_handler_combines_aggregate_and_list() {
    let mock_server = MockServer::start().await;
    let config = Arc::new(test_config(&mock_server.uri()));

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .and(query_param("select", "doctor_id,score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_rows(7, &[4, 5, 3])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/ratings"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            rating_json(3, 7, 3, "2026-08-03T12:00:00+00:00"),
        ])))
        .mount(&mock_server)
        .await;

    let result = handlers::get_doctor_ratings(
        State(config),
        Path(7),
        Query(RatingsListQuery { limit: None }),
    )
    .await;

    let response = result.expect("handler should succeed").0;
    assert_eq!(response["aggregate"]["average"], 4.0);
    assert_eq!(response["aggregate"]["count"], 3);
    assert!(response["ratings"].is_array());
}
