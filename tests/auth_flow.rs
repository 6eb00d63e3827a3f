// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Propgate Contributors

//! End-to-end authentication flows driven through the router.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use propgate::{api::router, auth::TokenIssuer, state::AppState, storage::UserStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const TEST_SECRET: &[u8] = b"integration-test-secret";

fn test_app() -> (Router, AppState, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = UserStore::open(&dir.path().join("users.redb")).expect("Failed to open store");
    let state = AppState::new(store, TokenIssuer::new(TEST_SECRET, 3600));
    (router(state.clone()), state, dir)
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_me(app: &Router, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::get("/v1/users/me");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn register_login_and_access_protected_route() {
    let (app, state, _dir) = test_app();

    // Register -> 201 with a token.
    let (status, body) = post_json(
        &app,
        "/v1/auth/register",
        json!({"username": "alice", "email": "a@x.com", "password": "p@ss"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let register_token = body["token"].as_str().expect("token in body").to_string();

    // Login with the same pair -> 200 with a token for the same subject.
    let (status, body) = post_json(
        &app,
        "/v1/auth/login",
        json!({"email": "a@x.com", "password": "p@ss"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let login_token = body["token"].as_str().unwrap().to_string();

    let subject_a = state.tokens.verify(&register_token).unwrap().user_id;
    let subject_b = state.tokens.verify(&login_token).unwrap().user_id;
    assert_eq!(subject_a, subject_b);

    // The token admits the protected route.
    let (status, body) = get_me(&app, Some(&login_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"].as_str().unwrap(), subject_a);
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let (app, _state, _dir) = test_app();

    post_json(
        &app,
        "/v1/auth/register",
        json!({"username": "alice", "email": "a@x.com", "password": "p@ss"}),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/v1/auth/login",
        json!({"email": "a@x.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid credentials.");

    // Unknown email must be indistinguishable.
    let (status, body) = post_json(
        &app,
        "/v1/auth/login",
        json!({"email": "nobody@x.com", "password": "p@ss"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid credentials.");
}

#[tokio::test]
async fn duplicate_registration_is_rejected_once() {
    let (app, _state, _dir) = test_app();

    let (status, _) = post_json(
        &app,
        "/v1/auth/register",
        json!({"username": "alice", "email": "a@x.com", "password": "p@ss"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &app,
        "/v1/auth/register",
        json!({"username": "somebody-else", "email": "a@x.com", "password": "p@ss"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists.");
}

#[tokio::test]
async fn wallet_login_twice_returns_same_subject() {
    let (app, state, _dir) = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/auth/wallet-login",
        json!({"walletAddress": "0xABC", "username": "bob"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account created.");
    let first = state
        .tokens
        .verify(body["token"].as_str().unwrap())
        .unwrap();

    let (status, body) = post_json(
        &app,
        "/v1/auth/wallet-login",
        json!({"walletAddress": "0xABC"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful.");
    let second = state
        .tokens
        .verify(body["token"].as_str().unwrap())
        .unwrap();

    assert_eq!(first.user_id, second.user_id);
    assert_eq!(second.wallet_address.as_deref(), Some("0xabc"));
}

#[tokio::test]
async fn first_wallet_login_without_username_is_400() {
    let (app, _state, _dir) = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/auth/wallet-login",
        json!({"walletAddress": "0xFRESH"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username is required.");
}

#[tokio::test]
async fn protected_route_rejects_bad_tokens() {
    let (app, state, _dir) = test_app();

    // No token at all.
    let (status, body) = get_me(&app, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "missing_auth_header");

    // A token signed with a different secret.
    let foreign = TokenIssuer::new(b"some-other-secret", 3600)
        .issue("user-1", None)
        .unwrap();
    let (status, _) = get_me(&app, Some(&foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A tampered token.
    let mut token = state.tokens.issue("user-1", None).unwrap();
    token.pop();
    let (status, _) = get_me(&app, Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // An expired token.
    let expired = TokenIssuer::new(TEST_SECRET, -60).issue("user-1", None).unwrap();
    let (status, _) = get_me(&app, Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_with_missing_fields_is_400() {
    let (app, _state, _dir) = test_app();

    let (status, body) = post_json(
        &app,
        "/v1/auth/register",
        json!({"username": "alice", "email": "", "password": "p@ss"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required.");
}

#[tokio::test]
async fn health_endpoints_respond() {
    let (app, _state, _dir) = test_app();

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
