mod common;

use axum::http::StatusCode;
use common::{ALICE_PASSWORD, BOB_PASSWORD, login, request, send, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_me_returns_current_user_without_password() {
    let (app, _) = setup_test_app();
    let token = login(&app, "alice", ALICE_PASSWORD).await;

    let response = send(&app, request("GET", "/users/me", Some(&token), None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "id": 1,
            "slug": "alice",
            "name": "Alice",
            "email": "alice@example.com",
            "roles": ["administrator"]
        })
    );
}

#[tokio::test]
async fn test_me_for_user_without_roles() {
    let (app, _) = setup_test_app();
    let token = login(&app, "bob", BOB_PASSWORD).await;

    let response = send(&app, request("GET", &format!("/users/me?token={token}"), None, None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["slug"], "bob");
    assert!(response.body.get("password").is_none());
}

#[tokio::test]
async fn test_me_requires_token() {
    let (app, _) = setup_test_app();

    let response = send(&app, request("GET", "/users/me", None, None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Requires authentication.");
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let (app, _) = setup_test_app();

    let response = send(&app, request("GET", "/users/me", Some("not-a-jwt"), None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "jwt malformed");
}

#[tokio::test]
async fn test_me_for_deleted_user_is_not_found() {
    let (app, state) = setup_test_app();
    let token = login(&app, "bob", BOB_PASSWORD).await;

    state.store.remove("users", "2").await.unwrap();

    let response = send(&app, request("GET", "/users/me", Some(&token), None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
