//! Test fixtures for creating test data through the API.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use super::TestHarness;

/// Request body for `POST /api/v1/users`
pub fn user_body(first_name: &str, city: &str, company: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Tester",
        "phoneNumber": "555-0100",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "city": city,
        "company": company,
    })
}

/// Request body for `POST /api/v1/events`, starting a week from now
pub fn event_body(slug: &str, owner_id: &str) -> Value {
    let start_at = Utc::now() + Duration::days(7);
    json!({
        "slug": slug,
        "title": format!("Event {}", slug),
        "description": "A test event",
        "startAt": start_at,
        "endAt": start_at + Duration::hours(2),
        "venue": "Main Hall",
        "maxCapacity": 100,
        "ownerId": owner_id,
        "hosts": [],
    })
}

/// Create a user and return its id
pub async fn create_user(ctx: &TestHarness, first_name: &str, city: &str, company: &str) -> String {
    let res = ctx
        .post("/api/v1/users", user_body(first_name, city, company))
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "create user: {}", res.body);
    id_of(&res.body)
}

/// Create an event owned by `owner_id` and return its id
pub async fn create_event(ctx: &TestHarness, slug: &str, owner_id: &str) -> String {
    let res = ctx.post("/api/v1/events", event_body(slug, owner_id)).await;
    assert_eq!(res.status, StatusCode::CREATED, "create event: {}", res.body);
    id_of(&res.body)
}

/// Register a user with an event under `role`
pub async fn register(ctx: &TestHarness, event_id: &str, user_id: &str, role: &str) {
    let res = ctx
        .put(
            &format!("/api/v1/events/{}/users/{}", event_id, user_id),
            json!({ "role": role }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "register: {}", res.body);
}

pub fn id_of(body: &Value) -> String {
    body["id"]
        .as_str()
        .expect("response has an id")
        .to_string()
}

/// First names of the users in a filter response, in response order
pub fn first_names(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .expect("response has items")
        .iter()
        .map(|u| u["firstName"].as_str().unwrap_or_default().to_string())
        .collect()
}
