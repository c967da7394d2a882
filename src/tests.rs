// HTTP tests for the Turf Booking API
// Each test builds the full router on a test database and drives it with axum-test

use super::*;
use crate::auth::Role;
use crate::config::AppConfig;
use crate::test_support::{
    booking_request, create_test_pool, create_turf, create_user, database_url, days_until, slot,
    test_state, unique_suffix,
};
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use chrono::Weekday;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;

// ============================================================================
// Test Helpers
// ============================================================================

/// Helper function to create a test server over the full router
async fn create_test_app() -> (TestServer, AppState) {
    let pool = create_test_pool().await;
    let state = test_state(pool);
    let server = TestServer::new(create_router(state.clone())).unwrap();
    (server, state)
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn authed(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(header::AUTHORIZATION, bearer(token))
}

/// Insert a user and mint an access token for it
async fn user_with_token(state: &AppState, role: Role) -> (i32, String) {
    let id = create_user(&state.db, role).await;
    let token = state
        .token_service
        .generate_access_token(id, "fixture@example.com", role)
        .unwrap();
    (id, token)
}

fn turf_payload() -> Value {
    json!({
        "name": format!("Arena {}", unique_suffix()),
        "address": "1 Ring Road",
        "city": "Pune",
        "state": "Maharashtra",
        "amenities": ["parking", "showers"],
        "opening_time": "06:00:00",
        "closing_time": "23:00:00"
    })
}

async fn create_turf_via_api(server: &TestServer, admin_token: &str) -> String {
    let response = authed(server.post("/api/admin/turfs"), admin_token)
        .json(&turf_payload())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let turf: Value = response.json();
    turf["id"].as_str().unwrap().to_string()
}

fn booking_payload(turf_id: &str, days_ahead: i64, start_hour: u32, hours: i64) -> Value {
    let (date, start, end) = slot(days_ahead, start_hour, hours);
    json!({
        "turf_id": turf_id,
        "date": date.to_string(),
        "start_time": start.to_rfc3339(),
        "end_time": end.to_rfc3339()
    })
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

// ============================================================================
// End-to-end booking flow
// ============================================================================

/// Admin sets up a turf, a user books the Saturday morning slot, the admin
/// confirms it, and a second user is turned away from the same slot
#[tokio::test]
async fn test_saturday_booking_flow() {
    let (server, _state) = create_test_app().await;

    let suffix = unique_suffix();
    let register = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Turf Owner",
            "email": format!("owner{}@example.com", suffix),
            "password": "owner-pass1",
            "role": "admin"
        }))
        .await;
    assert_eq!(register.status_code(), StatusCode::CREATED);
    let admin_token = register.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let turf_id = create_turf_via_api(&server, &admin_token).await;

    // Default pricing and settings were seeded with the turf
    let pricing: Value = server
        .get(&format!("/api/turfs/{}/pricing", turf_id))
        .await
        .json();
    assert_eq!(pricing.as_array().unwrap().len(), 6);
    let settings: Value = server
        .get(&format!("/api/turfs/{}/settings", turf_id))
        .await
        .json();
    assert_eq!(settings.as_array().unwrap().len(), 5);

    let mut user_tokens = Vec::new();
    for name in ["first", "second"] {
        let response = server
            .post("/api/auth/register")
            .json(&json!({
                "name": format!("{} player", name),
                "email": format!("{}{}@example.com", name, suffix),
                "password": "player-pass1"
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        user_tokens.push(response.json::<Value>()["access_token"].as_str().unwrap().to_string());
    }

    let saturday = days_until(Weekday::Sat);
    let response = authed(server.post("/api/bookings"), &user_tokens[0])
        .json(&booking_payload(&turf_id, saturday, 10, 1))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let booking: Value = response.json();
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["effective_status"], "pending");
    assert_eq!(decimal(&booking["price"]), dec!(700));
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let confirm = authed(
        server.patch(&format!("/api/admin/bookings/{}/confirm", booking_id)),
        &admin_token,
    )
    .await;
    assert_eq!(confirm.status_code(), StatusCode::OK);
    assert_eq!(confirm.json::<Value>()["status"], "confirmed");

    let conflict = authed(server.post("/api/bookings"), &user_tokens[1])
        .json(&booking_payload(&turf_id, saturday, 10, 1))
        .await;
    assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
    assert_eq!(conflict.json::<Value>()["error_code"], "SLOT_TAKEN");
}

// ============================================================================
// Access control
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let (server, state) = create_test_app().await;
    let (_, user_token) = user_with_token(&state, Role::User).await;

    let anonymous = server.post("/api/admin/turfs").json(&turf_payload()).await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);

    let as_user = authed(server.post("/api/admin/turfs"), &user_token)
        .json(&turf_payload())
        .await;
    assert_eq!(as_user.status_code(), StatusCode::FORBIDDEN);

    let stats = authed(server.get("/api/admin/stats"), &user_token).await;
    assert_eq!(stats.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_booking_requires_authentication() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    let response = server
        .post("/api/bookings")
        .json(&booking_payload(&turf_id, 2, 10, 1))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_cannot_edit_foreign_turf() {
    let (server, state) = create_test_app().await;
    let (_, owner_token) = user_with_token(&state, Role::Admin).await;
    let (_, other_token) = user_with_token(&state, Role::Admin).await;
    let turf_id = create_turf_via_api(&server, &owner_token).await;

    let response = authed(server.put(&format!("/api/admin/turfs/{}", turf_id)), &other_token)
        .json(&json!({ "name": "Hijacked" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let pricing = authed(
        server.put(&format!("/api/admin/turfs/{}/pricing", turf_id)),
        &other_token,
    )
    .json(&json!({ "prices": [{ "day_type": "weekday", "time_slot": "morning", "price": "1" }] }))
    .await;
    assert_eq!(pricing.status_code(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Turfs
// ============================================================================

#[tokio::test]
async fn test_create_turf_rejects_inverted_hours() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;

    let mut payload = turf_payload();
    payload["opening_time"] = json!("22:00:00");
    payload["closing_time"] = json!("02:00:00");

    let response = authed(server.post("/api/admin/turfs"), &admin_token)
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "INVALID_HOURS");
}

#[tokio::test]
async fn test_soft_delete_hides_turf_from_public_list() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    // City match ignores case
    let before: Value = server
        .get("/api/turfs")
        .add_query_param("city", "pune")
        .await
        .json();
    assert!(before
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"].as_str() == Some(turf_id.as_str())));

    let delete = authed(server.delete(&format!("/api/admin/turfs/{}", turf_id)), &admin_token).await;
    assert_eq!(delete.status_code(), StatusCode::NO_CONTENT);

    let fetched: Value = server.get(&format!("/api/turfs/{}", turf_id)).await.json();
    assert_eq!(fetched["status"], "inactive");

    let listed: Value = server
        .get("/api/turfs")
        .add_query_param("city", "pune")
        .await
        .json();
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["id"].as_str() != Some(turf_id.as_str())));
}

#[tokio::test]
async fn test_hard_delete_removes_turf() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    let delete = authed(
        server
            .delete(&format!("/api/admin/turfs/{}", turf_id))
            .add_query_param("hard", "true"),
        &admin_token,
    )
    .await;
    assert_eq!(delete.status_code(), StatusCode::NO_CONTENT);

    let fetched = server.get(&format!("/api/turfs/{}", turf_id)).await;
    assert_eq!(fetched.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Pricing and settings
// ============================================================================

#[tokio::test]
async fn test_price_update_applies_to_next_booking() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let (_, user_token) = user_with_token(&state, Role::User).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    let saturday = days_until(Weekday::Sat);

    // Warm the rate cache with a first booking
    let first = authed(server.post("/api/bookings"), &user_token)
        .json(&booking_payload(&turf_id, saturday, 7, 1))
        .await;
    assert_eq!(decimal(&first.json::<Value>()["price"]), dec!(700));

    let update = authed(
        server.put(&format!("/api/admin/turfs/{}/pricing", turf_id)),
        &admin_token,
    )
    .json(&json!({ "prices": [{ "day_type": "weekend", "time_slot": "morning", "price": "900" }] }))
    .await;
    assert_eq!(update.status_code(), StatusCode::OK);

    let second = authed(server.post("/api/bookings"), &user_token)
        .json(&booking_payload(&turf_id, saturday, 9, 1))
        .await;
    assert_eq!(second.status_code(), StatusCode::CREATED);
    assert_eq!(decimal(&second.json::<Value>()["price"]), dec!(900));
}

#[tokio::test]
async fn test_booking_without_rate_is_not_found() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let (_, user_token) = user_with_token(&state, Role::User).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    sqlx::query(
        "DELETE FROM pricing WHERE turf_id = $1 AND day_type = 'weekend' AND time_slot = 'morning'",
    )
    .bind(uuid::Uuid::parse_str(&turf_id).unwrap())
    .execute(&state.db)
    .await
    .unwrap();

    let response = authed(server.post("/api/bookings"), &user_token)
        .json(&booking_payload(&turf_id, days_until(Weekday::Sun), 9, 1))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error_code"], "PRICING_NOT_CONFIGURED");
    assert_eq!(
        body["message"],
        format!("No weekend morning price configured for turf {}", turf_id)
    );

    // Other slots still price normally
    let evening = authed(server.post("/api/bookings"), &user_token)
        .json(&booking_payload(&turf_id, days_until(Weekday::Sun), 19, 1))
        .await;
    assert_eq!(evening.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    let response = authed(
        server.put(&format!("/api/admin/turfs/{}/pricing", turf_id)),
        &admin_token,
    )
    .json(&json!({ "prices": [{ "day_type": "weekday", "time_slot": "evening", "price": "-5" }] }))
    .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_disabled_bookings_return_503() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let (_, user_token) = user_with_token(&state, Role::User).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    let disable = authed(
        server.put(&format!("/api/admin/turfs/{}/settings/booking-status", turf_id)),
        &admin_token,
    )
    .json(&json!({ "disabled": true, "reason": "Monsoon closure" }))
    .await;
    assert_eq!(disable.status_code(), StatusCode::OK);
    assert_eq!(disable.json::<Value>()["disabled"], true);

    let response = authed(server.post("/api/bookings"), &user_token)
        .json(&booking_payload(&turf_id, 2, 10, 1))
        .await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error_code"], "BOOKINGS_DISABLED");
    assert_eq!(body["message"], "Monsoon closure");
}

#[tokio::test]
async fn test_single_setting_update_and_read() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    let update = authed(
        server.put(&format!(
            "/api/admin/turfs/{}/settings/keys/max_booking_hours",
            turf_id
        )),
        &admin_token,
    )
    .json(&json!({ "value": "2" }))
    .await;
    assert_eq!(update.status_code(), StatusCode::OK);

    let setting: Value = server
        .get(&format!("/api/turfs/{}/settings/max_booking_hours", turf_id))
        .await
        .json();
    assert_eq!(setting["value"], "2");

    let invalid = authed(
        server.put(&format!(
            "/api/admin/turfs/{}/settings/keys/max_booking_hours",
            turf_id
        )),
        &admin_token,
    )
    .json(&json!({ "value": "forever" }))
    .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_with_and_without_body() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let (_, user_token) = user_with_token(&state, Role::User).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    let mut ids = Vec::new();
    for hour in [10, 12] {
        let booking: Value = authed(server.post("/api/bookings"), &user_token)
            .json(&booking_payload(&turf_id, 4, hour, 1))
            .await
            .json();
        ids.push(booking["id"].as_str().unwrap().to_string());
    }

    let with_reason = authed(server.delete(&format!("/api/bookings/{}", ids[0])), &user_token)
        .json(&json!({ "reason": "Team short of players" }))
        .await;
    assert_eq!(with_reason.status_code(), StatusCode::OK);
    assert_eq!(
        with_reason.json::<Value>()["cancellation_reason"],
        "Team short of players"
    );

    let without_body = authed(server.delete(&format!("/api/bookings/{}", ids[1])), &user_token).await;
    assert_eq!(without_body.status_code(), StatusCode::OK);
    assert_eq!(without_body.json::<Value>()["status"], "cancelled");

    let again = authed(server.delete(&format!("/api/bookings/{}", ids[1])), &user_token).await;
    assert_eq!(again.status_code(), StatusCode::CONFLICT);
    assert_eq!(again.json::<Value>()["error_code"], "ALREADY_CANCELLED");
}

// ============================================================================
// Reviews, stats and docs
// ============================================================================

#[tokio::test]
async fn test_review_of_future_booking_is_rejected() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let (_, user_token) = user_with_token(&state, Role::User).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    let booking: Value = authed(server.post("/api/bookings"), &user_token)
        .json(&booking_payload(&turf_id, 2, 15, 1))
        .await
        .json();

    let review = authed(server.post("/api/reviews"), &user_token)
        .json(&json!({ "booking_id": booking["id"], "rating": 5 }))
        .await;
    assert_eq!(review.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(review.json::<Value>()["error_code"], "NOT_YET_COMPLETED");

    let bad_rating = authed(server.post("/api/reviews"), &user_token)
        .json(&json!({ "booking_id": booking["id"], "rating": 9 }))
        .await;
    assert_eq!(bad_rating.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(bad_rating.json::<Value>()["error_code"], "INVALID_RATING");
}

#[tokio::test]
async fn test_admin_stats_and_metrics() {
    let (server, state) = create_test_app().await;
    let (_, admin_token) = user_with_token(&state, Role::Admin).await;
    let (_, user_token) = user_with_token(&state, Role::User).await;
    let turf_id = create_turf_via_api(&server, &admin_token).await;

    authed(server.post("/api/bookings"), &user_token)
        .json(&booking_payload(&turf_id, 3, 18, 2))
        .await;

    let response = authed(
        server.get("/api/admin/stats").add_query_param("refresh", "true"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let stats: Value = response.json();
    assert_eq!(stats["overview"]["total_bookings"], 1);
    assert_eq!(stats["last_7_days"]["unit"], "day");
    assert_eq!(stats["last_7_days"]["breakdown"][6]["label"], "Today");
    assert_eq!(stats["last_5_weeks"]["breakdown"][4]["label"], "This Week");
    assert_eq!(stats["insights"]["average_booking_duration"], 2.0);

    let metrics = authed(server.get("/api/admin/metrics"), &admin_token).await;
    assert_eq!(metrics.status_code(), StatusCode::OK);
    assert!(metrics.json::<Value>()["booking_creations"]["count"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (server, _state) = create_test_app().await;

    let response = server.get("/api-docs/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/bookings"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
}

// ============================================================================
// Maintenance
// ============================================================================

#[tokio::test]
async fn test_maintenance_purges_expired_cache_entries() {
    let pool = create_test_pool().await;
    let mut config = AppConfig::for_tests(&database_url());
    config.pricing_cache_ttl = std::time::Duration::ZERO;
    config.stats_cache_ttl = std::time::Duration::ZERO;
    let state = AppState::new(pool.clone(), config);

    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let turf = create_turf(&state, admin).await;

    // One cached rate and one cached stats payload
    state
        .booking_service
        .create_for_user(user, Role::User, booking_request(turf.id, 2, 10, 1))
        .await
        .unwrap();
    state.stats_service.get(admin, false).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    assert_eq!(run_maintenance(&state).await, 2);
    assert_eq!(run_maintenance(&state).await, 0);
}
