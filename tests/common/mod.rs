#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use fauxrest::router::init_router;
use fauxrest::state::AppState;
use fauxrest_config::{CorsConfig, DelayConfig, JwtConfig};
use fauxrest_store::JsonStore;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

pub const ALICE_PASSWORD: &str = "wonderland";
pub const BOB_PASSWORD: &str = "builder";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-at-least-32-chars".to_string(),
        issuer: "fauxrest-test".to_string(),
        audience: "fauxrest-clients".to_string(),
        expiry_secs: 3600,
        leeway_secs: 0,
        revocation_prune_interval_secs: 300,
    }
}

/// alice is an administrator, bob has no roles.
pub fn dataset() -> Value {
    json!({
        "users": [
            {
                "id": 1,
                "slug": "alice",
                "name": "Alice",
                "email": "alice@example.com",
                "password": bcrypt::hash(ALICE_PASSWORD, 4).unwrap(),
                "roles": ["administrator"]
            },
            {
                "id": 2,
                "slug": "bob",
                "name": "Bob",
                "password": bcrypt::hash(BOB_PASSWORD, 4).unwrap(),
                "roles": []
            }
        ],
        "posts": [
            { "id": 1, "title": "Hello", "author": "alice", "views": 10 },
            { "id": 2, "title": "Second", "author": "bob", "views": 30 },
            { "id": 3, "title": "Third", "author": "alice", "views": 20 }
        ],
        "profile": { "name": "demo" }
    })
}

pub fn state_with_store(store: JsonStore) -> AppState {
    AppState::new(
        jwt_config(),
        CorsConfig::from_origins("http://localhost:5173"),
        &DelayConfig::default(),
        store,
    )
}

pub fn test_state() -> AppState {
    state_with_store(JsonStore::in_memory(dataset()).unwrap())
}

pub fn setup_test_app() -> (Router, AppState) {
    let state = test_state();
    (init_router(state.clone()), state)
}

/// Writes the test dataset to a fresh temp file.
pub fn temp_dataset() -> PathBuf {
    let path = std::env::temp_dir().join(format!("fauxrest-it-{}.json", Uuid::new_v4()));
    std::fs::write(&path, serde_json::to_vec_pretty(&dataset()).unwrap()).unwrap();
    path
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        request(
            "POST",
            "/tokens",
            None,
            Some(json!({ "username": username, "password": password })),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
    response.body["token"].as_str().unwrap().to_string()
}
