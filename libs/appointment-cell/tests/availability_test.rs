// libs/appointment-cell/tests/availability_test.rs
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers::{self, SlotsQuery};
use appointment_cell::models::UPCOMING_SLOTS_LIMIT;
use appointment_cell::services::availability::SlotAvailabilityService;
use shared_config::AppConfig;
use shared_models::error::AppError;

fn test_config(url: &str) -> AppConfig {
    AppConfig {
        supabase_url: url.to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        port: 3000,
    }
}

fn slot_json(id: i64, doctor_id: i64, start_time: &str, is_booked: bool) -> serde_json::Value {
    json!({
        "id": id,
        "doctor_id": doctor_id,
        "start_time": start_time,
        "duration_min": 20,
        "is_booked": is_booked
    })
}

fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[tokio::test]
async fn test_list_upcoming_slots_includes_booked_ones() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_slots"))
        .and(query_param("doctor_id", "eq.7"))
        .and(query_param("order", "start_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            slot_json(1, 7, "2026-09-01T09:00:00+00:00", true),
            slot_json(2, 7, "2026-09-01T10:00:00+00:00", false),
            slot_json(3, 7, "2026-09-01T11:00:00+00:00", false),
        ])))
        .mount(&mock_server)
        .await;

    let service = SlotAvailabilityService::new(&config);
    let slots = service
        .list_upcoming_slots(7, instant("2026-09-01T08:00:00+00:00"), UPCOMING_SLOTS_LIMIT)
        .await
        .expect("listing should succeed");

    assert_eq!(slots.len(), 3);
    assert!(slots[0].is_booked);
    assert!(!slots[1].is_booked);
    assert_eq!(slots[1].start_time, instant("2026-09-01T10:00:00+00:00"));
}

#[tokio::test]
async fn test_list_upcoming_slots_empty_for_unknown_doctor() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = SlotAvailabilityService::new(&config);
    let slots = service
        .list_upcoming_slots(12345, Utc::now(), UPCOMING_SLOTS_LIMIT)
        .await
        .expect("listing should succeed");

    assert!(slots.is_empty());
}

/// T1 booked < T2 free < T3 free: the earliest *free* slot wins, so the
/// store query must carry the free-only filter.
#[tokio::test]
async fn test_next_free_slot_skips_booked_earlier_slot() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_slots"))
        .and(query_param("doctor_id", "eq.7"))
        .and(query_param("is_booked", "is.false"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([slot_json(2, 7, "2026-09-01T10:00:00+00:00", false)])),
        )
        .mount(&mock_server)
        .await;

    let service = SlotAvailabilityService::new(&config);
    let slot = service
        .next_free_slot(7, instant("2026-09-01T08:00:00+00:00"))
        .await
        .expect("query should succeed")
        .expect("a free slot exists");

    assert_eq!(slot.id, 2);
    assert_eq!(slot.start_time, instant("2026-09-01T10:00:00+00:00"));
}

#[tokio::test]
async fn test_next_free_slot_none_when_fully_booked() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = SlotAvailabilityService::new(&config);
    let slot = service
        .next_free_slot(7, Utc::now())
        .await
        .expect("query should succeed");

    assert!(slot.is_none());
}

#[tokio::test]
async fn test_slots_handler_requires_doctor_id() {
    let config = Arc::new(test_config("http://127.0.0.1:9"));

    let result = handlers::list_slots(
        State(config),
        Query(SlotsQuery {
            doctor_id: None,
            from: None,
        }),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}
