//! Router-level tests for the authentication and authorization paths
//! that resolve before any database query: token extraction, role
//! layering and body validation.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{test_app, token_for_role};
use http_body_util::BodyExt;
use serde_json::json;
use slateboard_models::users::UserRole;
use tower::ServiceExt;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_login_missing_password_is_bad_request() {
    let app = test_app();

    let request = json_request("POST", "/api/auth/login", json!({ "username": "jdoe" }));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn test_login_empty_credentials_fail_validation() {
    let app = test_app();

    let request = json_request(
        "POST",
        "/api/auth/login",
        json!({ "username": "", "password": "" }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_without_json_content_type_is_bad_request() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .body(Body::from(r#"{"username":"jdoe","password":"pw"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_with_garbage_token_is_unauthorized() {
    let app = test_app();

    let request = json_request(
        "POST",
        "/api/auth/refresh",
        json!({ "refresh": "garbage.token.value" }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = test_app();

    // An access token is not a refresh token, even when freshly minted.
    let access = token_for_role(UserRole::Student);
    let request = json_request("POST", "/api/auth/refresh", json!({ "refresh": access }));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_without_token_is_unauthorized() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/profile/me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_with_invalid_token_is_unauthorized() {
    let app = test_app();

    let request = bearer_request("GET", "/api/profile/me", "not.a.token");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_with_malformed_auth_header_is_unauthorized() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/profile/me")
        .header("authorization", "Token abc123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_listing_requires_admin_role() {
    for role in [UserRole::Teacher, UserRole::Student, UserRole::Staff] {
        let app = test_app();
        let token = token_for_role(role);

        let request = bearer_request("GET", "/api/users", &token);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_users_listing_without_token_is_unauthorized() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/users")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_requires_admin_role() {
    let app = test_app();
    let token = token_for_role(UserRole::Teacher);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": "newstaff",
                "email": "newstaff@example.com",
                "first_name": "New",
                "last_name": "Staff",
                "password": "password123",
                "role": "staff"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_teacher_payload_missing_fields_is_unprocessable() {
    let app = test_app();
    let token = token_for_role(UserRole::Admin);

    // Role teacher without employee_id/department/qualification/hire_date
    // is rejected before any insert.
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": "newteacher",
                "email": "newteacher@example.com",
                "first_name": "New",
                "last_name": "Teacher",
                "password": "password123",
                "role": "teacher"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("employee_id"));
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = test_app();
    let token = token_for_role(UserRole::Admin);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "username": "newuser",
                "email": "newuser@example.com",
                "first_name": "New",
                "last_name": "User",
                "password": "password123",
                "role": "superuser"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
