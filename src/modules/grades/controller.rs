use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::grades::model::{
    CreateGradeDto, GradeDetail, PaginatedGradesResponse, UpdateGradeDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::grades::service::GradeService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_scope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, PaginationMeta};
use crate::validator::ValidatedJson;

/// List grades visible to the requester
#[utoipa::path(
    get,
    path = "/api/grades",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated grade listing", body = PaginatedGradesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grades(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedGradesResponse>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let (grades, total) = GradeService::list_grades(&state.db, &scope, &params).await?;

    Ok(Json(PaginatedGradesResponse {
        data: grades,
        meta: PaginationMeta::new(params.page(), params.page_size(), total),
    }))
}

/// Get a single grade
#[utoipa::path(
    get,
    path = "/api/grades/{id}",
    params(
        ("id" = Uuid, Path, description = "Grade ID")
    ),
    responses(
        (status = 200, description = "Grade details", body = GradeDetail),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Grade not found or out of scope", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GradeDetail>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let grade = GradeService::get_grade(&state.db, &scope, id).await?;
    Ok(Json(grade))
}

/// Record a grade (teacher or admin); the letter grade is computed server-side
#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = GradeDetail),
        (status = 400, description = "Bad request - duplicate grade or missing references", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation error - marks out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument(skip(state, dto))]
pub async fn create_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<GradeDetail>), AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let grade = GradeService::create_grade(&state.db, &scope, dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

/// Update a grade (admin, or a teacher for their classes)
#[utoipa::path(
    put,
    path = "/api/grades/{id}",
    params(
        ("id" = Uuid, Path, description = "Grade ID")
    ),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated", body = GradeDetail),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Grade not found or out of scope", body = ErrorResponse),
        (status = 422, description = "Validation error - marks out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument(skip(state, dto))]
pub async fn update_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<Json<GradeDetail>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let grade = GradeService::update_grade(&state.db, &scope, id, dto).await?;
    Ok(Json(grade))
}

/// Delete a grade (admin, or a teacher for their classes)
#[utoipa::path(
    delete,
    path = "/api/grades/{id}",
    params(
        ("id" = Uuid, Path, description = "Grade ID")
    ),
    responses(
        (status = 200, description = "Grade deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Grade not found or out of scope", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn delete_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    GradeService::delete_grade(&state.db, &scope, id).await?;
    Ok(Json(json!({"message": "Grade deleted successfully"})))
}
