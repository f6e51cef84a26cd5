//! HTTP API integration tests.
//!
//! Exercises the full router over the mock environment: status codes,
//! stable error codes in JSON bodies, bearer-token enforcement and the
//! password-reset flow, all without a real database or SMTP server.
//!
//! Run with: `cargo test --test http_api_test`

#![allow(clippy::unwrap_used, clippy::panic)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use courtside::constants::auth::RESET_CODE_TTL_MINUTES;
use courtside::mocks::{SentEmail, TestEnvironment};
use courtside::router::app_router;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn harness() -> (Router, TestEnvironment) {
    let t = TestEnvironment::new();
    (app_router(t.env.clone()), t)
}

/// Send one request and decode the response as JSON (Null when the body
/// is empty or not JSON).
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn patch_json(uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn delete_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Register over HTTP and hand back the session token and user id.
async fn register(app: &Router, username: &str) -> (String, Uuid) {
    let (status, body) = send(
        app,
        post_json(
            "/api/users/register",
            None,
            &json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "volley99",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = body["token"].as_str().unwrap().to_string();
    let user_id = Uuid::parse_str(body["user_id"].as_str().unwrap()).unwrap();
    (token, user_id)
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (app, _t) = harness();

    let (status, body) = send(
        &app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(
        &app,
        Request::builder().uri("/ready").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn register_then_login() {
    let (app, _t) = harness();

    let (status, body) = send(
        &app,
        post_json(
            "/api/users/register",
            None,
            &json!({"username": "ana", "email": "ana@example.com", "password": "volley99"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "ana");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    // The same email again is a conflict
    let (status, body) = send(
        &app,
        post_json(
            "/api/users/register",
            None,
            &json!({"username": "ana2", "email": "ana@example.com", "password": "volley99"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "IDENTITY_TAKEN");

    // Login with the right password
    let (status, body) = send(
        &app,
        post_json(
            "/api/users/login",
            None,
            &json!({"email": "ana@example.com", "password": "volley99"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ana");

    // And with the wrong one
    let (status, body) = send(
        &app,
        post_json(
            "/api/users/login",
            None,
            &json!({"email": "ana@example.com", "password": "wrong99"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn event_routes_require_a_bearer_token() {
    let (app, _t) = harness();

    // No Authorization header at all
    let request = Request::builder()
        .uri("/api/events")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );

    // An unknown token is rejected the same way
    let (status, body) = send(&app, get_auth("/api/events", "not-a-real-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    // A non-bearer scheme never reaches token verification
    let request = Request::builder()
        .uri("/api/events")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn event_crud_round_trip() {
    let (app, _t) = harness();
    let (token, user_id) = register(&app, "casey").await;

    // Create, with the optional fields left to their defaults
    let (status, created) = send(
        &app,
        post_json(
            "/api/events",
            Some(&token),
            &json!({
                "date": "2025-03-01T18:00:00Z",
                "time": "18:00",
                "address": "Riverside Court",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["event_type"], "pickleball");
    assert_eq!(created["is_public"], true);
    assert_eq!(created["fees"], 0);
    assert_eq!(created["weather"], "N/A");
    assert_eq!(created["created_by"], user_id.to_string());
    let event_id = created["id"].as_str().unwrap().to_string();

    // Read it back
    let (status, fetched) = send(&app, get_auth(&format!("/api/events/{event_id}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], event_id.as_str());

    // The same slot again is a duplicate
    let (status, body) = send(
        &app,
        post_json(
            "/api/events",
            Some(&token),
            &json!({
                "date": "2025-03-01T18:00:00Z",
                "time": "18:00",
                "address": "Riverside Court",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_EVENT");

    // List under ?scope=mine
    let (status, listing) = send(&app, get_auth("/api/events?scope=mine", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["events"][0]["id"], event_id.as_str());

    // Patch two fields
    let (status, patched) = send(
        &app,
        patch_json(
            &format!("/api/events/{event_id}"),
            &token,
            &json!({"fees": 5, "weather": "sunny"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["fees"], 5);
    assert_eq!(patched["weather"], "sunny");

    // Delete
    let response = app
        .clone()
        .oneshot(delete_auth(&format!("/api/events/{event_id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone
    let (status, body) = send(&app, get_auth(&format!("/api/events/{event_id}"), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EVENT_NOT_FOUND");
}

#[tokio::test]
async fn membership_and_comment_routes() {
    let (app, _t) = harness();
    let (host_token, _) = register(&app, "host").await;
    let (guest_token, guest_id) = register(&app, "guest").await;
    register(&app, "riley").await;

    let (_, created) = send(
        &app,
        post_json(
            "/api/events",
            Some(&host_token),
            &json!({"date": "2025-03-08T10:00:00Z", "time": "10:00", "address": "Court 2"}),
        ),
    )
    .await;
    let event_id = created["id"].as_str().unwrap().to_string();

    // Guest joins
    let (status, joined) = send(
        &app,
        post_empty(&format!("/api/events/{event_id}/join"), &guest_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let players: Vec<&str> = joined["joined_players"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let guest = guest_id.to_string();
    assert!(players.contains(&guest.as_str()));

    // Joining twice is a conflict
    let (status, body) = send(
        &app,
        post_empty(&format!("/api/events/{event_id}/join"), &guest_token),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_JOINED");

    // Guest comments
    let (status, commented) = send(
        &app,
        post_json(
            &format!("/api/events/{event_id}/comments"),
            Some(&guest_token),
            &json!({"text": "see you there"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(commented["comments"][0]["username"], "guest");

    // The host invites a third player by username
    let (status, invited) = send(
        &app,
        post_json(
            &format!("/api/events/{event_id}/invitations"),
            Some(&host_token),
            &json!({"username": "riley"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invited["invited_players"].as_array().unwrap().len(), 1);

    // The guest cannot invite
    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/events/{event_id}/invitations"),
            Some(&guest_token),
            &json!({"username": "host"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // Guest leaves; the comment stays behind
    let (status, left) = send(
        &app,
        post_empty(&format!("/api/events/{event_id}/leave"), &guest_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(left["comments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_account_cascades_and_guards() {
    let (app, _t) = harness();
    let (vic_token, vic_id) = register(&app, "vic").await;
    let (wes_token, _) = register(&app, "wes").await;

    let (_, created) = send(
        &app,
        post_json(
            "/api/events",
            Some(&vic_token),
            &json!({"date": "2025-04-01T09:00:00Z", "time": "09:00", "address": "Court 3"}),
        ),
    )
    .await;
    let event_id = created["id"].as_str().unwrap().to_string();

    // Wes cannot delete Vic's account
    let (status, body) = send(&app, delete_auth(&format!("/api/users/{vic_id}"), &wes_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // Vic deletes the account; the event goes too
    let (status, outcome) = send(&app, delete_auth(&format!("/api/users/{vic_id}"), &vic_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["events_deleted"], 1);

    let (status, _) = send(&app, get_auth(&format!("/api/events/{event_id}"), &wes_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn password_reset_flow_over_http() {
    let (app, t) = harness();
    register(&app, "zoe").await;

    // Request a code; the answer never reveals whether the email exists
    let (status, body) = send(
        &app,
        post_json(
            "/api/users/password-reset/request",
            None,
            &json!({"email": "zoe@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("If that email"));

    let (status, _) = send(
        &app,
        post_json(
            "/api/users/password-reset/request",
            None,
            &json!({"email": "ghost@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Exactly one delivery, for the account that exists
    let sent = t.email.sent().unwrap();
    assert_eq!(sent.len(), 1);
    let SentEmail::PasswordReset { code, .. } = &sent[0] else {
        panic!("expected a reset email, got {sent:?}");
    };

    // Confirm with the emailed code
    let (status, _) = send(
        &app,
        post_json(
            "/api/users/password-reset/confirm",
            None,
            &json!({"code": code, "new_password": "drive77"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password is dead, the new one logs in
    let (status, _) = send(
        &app,
        post_json(
            "/api/users/login",
            None,
            &json!({"email": "zoe@example.com", "password": "volley99"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        post_json(
            "/api/users/login",
            None,
            &json!({"email": "zoe@example.com", "password": "drive77"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The code was burned on use
    let (status, body) = send(
        &app,
        post_json(
            "/api/users/password-reset/confirm",
            None,
            &json!({"code": code, "new_password": "lob88888"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_RESET_CODE");

    // A fresh code stops working once its TTL passes
    let (status, _) = send(
        &app,
        post_json(
            "/api/users/password-reset/request",
            None,
            &json!({"email": "zoe@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sent = t.email.sent().unwrap();
    let SentEmail::PasswordReset { code, .. } = &sent[1] else {
        panic!("expected a second reset email, got {sent:?}");
    };

    t.clock.advance(Duration::minutes(RESET_CODE_TTL_MINUTES));
    let (status, body) = send(
        &app,
        post_json(
            "/api/users/password-reset/confirm",
            None,
            &json!({"code": code, "new_password": "smash99"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_RESET_CODE");
}

#[tokio::test]
async fn validation_failures_are_bad_requests() {
    let (app, _t) = harness();

    // Username below the minimum length
    let (status, body) = send(
        &app,
        post_json(
            "/api/users/register",
            None,
            &json!({"username": "ab", "email": "ab@example.com", "password": "volley99"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    // Blank address on event creation
    let (token, _) = register(&app, "vala").await;
    let (status, body) = send(
        &app,
        post_json(
            "/api/events",
            Some(&token),
            &json!({"date": "2025-03-01T18:00:00Z", "time": "18:00", "address": "  "}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}
