use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classes::model::ClassListItem;
use crate::modules::students::model::StudentListItem;
use crate::modules::teachers::model::{
    CreateTeacherDto, PaginatedTeachersResponse, TeacherDetail, UpdateTeacherDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_scope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, PaginationMeta};
use crate::validator::ValidatedJson;

/// List teachers
#[utoipa::path(
    get,
    path = "/api/teachers",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated teacher listing", body = PaginatedTeachersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedTeachersResponse>, AppError> {
    let (teachers, total) = TeacherService::list_teachers(&state.db, &params).await?;

    Ok(Json(PaginatedTeachersResponse {
        data: teachers,
        meta: PaginationMeta::new(params.page(), params.page_size(), total),
    }))
}

/// Get a single teacher with their subjects
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher details", body = TeacherDetail),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TeacherDetail>, AppError> {
    let teacher = TeacherService::get_teacher(&state.db, id).await?;
    Ok(Json(teacher))
}

/// Attach a teacher profile to an existing user (admin only)
#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = TeacherDetail),
        (status = 400, description = "Bad request - duplicate employee id or missing references", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<TeacherDetail>), AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let teacher = TeacherService::create_teacher(&state.db, &scope, dto).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

/// Update a teacher (admin, or the teacher's own profile)
#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherDetail),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<TeacherDetail>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let teacher = TeacherService::update_teacher(&state.db, &scope, id, dto).await?;
    Ok(Json(teacher))
}

/// Delete a teacher (admin only)
#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    TeacherService::delete_teacher(&state.db, &scope, id).await?;
    Ok(Json(json!({"message": "Teacher deleted successfully"})))
}

/// Classes taught by a teacher
#[utoipa::path(
    get,
    path = "/api/teachers/{id}/classes",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Classes taught by the teacher", body = [ClassListItem]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher_classes(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClassListItem>>, AppError> {
    let classes = TeacherService::teacher_classes(&state.db, id).await?;
    Ok(Json(classes))
}

/// Students in classes taught by a teacher
#[utoipa::path(
    get,
    path = "/api/teachers/{id}/students",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Students taught by the teacher", body = [StudentListItem]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher_students(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StudentListItem>>, AppError> {
    let students = TeacherService::teacher_students(&state.db, id).await?;
    Ok(Json(students))
}
