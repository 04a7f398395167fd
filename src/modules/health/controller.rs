use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::instrument;

/// Health check for monitoring (no auth)
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "Meta"
)]
#[instrument]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Slateboard API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Index of the API surface (no auth)
#[utoipa::path(
    get,
    path = "/api",
    responses(
        (status = 200, description = "Endpoint index")
    ),
    tag = "Meta"
)]
#[instrument]
pub async fn api_index() -> Json<Value> {
    Json(json!({
        "message": "Slateboard API v1",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "authentication": {
                "login": "/api/auth/login",
                "refresh": "/api/auth/refresh",
                "register": "/api/auth/register"
            },
            "profile": { "me": "/api/profile/me" },
            "dashboard": { "stats": "/api/dashboard/stats" },
            "users": {
                "list": "/api/users",
                "detail": "/api/users/{id}",
                "convert_to_teacher": "/api/users/convert-to-teacher",
                "convert_to_student": "/api/users/convert-to-student"
            },
            "students": { "collection": "/api/students", "detail": "/api/students/{id}" },
            "teachers": {
                "collection": "/api/teachers",
                "detail": "/api/teachers/{id}",
                "classes": "/api/teachers/{id}/classes",
                "students": "/api/teachers/{id}/students"
            },
            "classes": { "collection": "/api/classes", "detail": "/api/classes/{id}" },
            "subjects": { "collection": "/api/subjects", "detail": "/api/subjects/{id}" },
            "assignments": { "collection": "/api/assignments", "detail": "/api/assignments/{id}" },
            "grades": { "collection": "/api/grades", "detail": "/api/grades/{id}" },
            "attendance": { "collection": "/api/attendance", "detail": "/api/attendance/{id}" }
        },
        "authentication": {
            "type": "JWT Bearer Token",
            "header": "Authorization: Bearer <token>",
            "obtain_token": "/api/auth/login"
        },
        "permissions": {
            "admin": "Full access to all resources",
            "teacher": "Access to assigned classes, students and grading",
            "student": "Read-only access to own data",
            "staff": "Read-only access to most resources"
        }
    }))
}
