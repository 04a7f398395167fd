mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::test_app;
use http_body_util::BodyExt;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body["status"], "healthy");
    assert!(body.get("version").is_some());
    assert!(body.get("timestamp").is_some());
}

#[tokio::test]
async fn test_api_index_lists_endpoints() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body["endpoints"]["authentication"]["login"], "/api/auth/login");
    assert_eq!(body["endpoints"]["grades"]["collection"], "/api/grades");
    assert_eq!(body["authentication"]["type"], "JWT Bearer Token");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(body["info"]["title"], "Slateboard API");
    assert!(body["paths"].get("/api/students").is_some());
    assert!(body["paths"].get("/api/attendance/{id}").is_some());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/nonexistent")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
