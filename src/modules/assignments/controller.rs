use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::assignments::model::{
    AssignmentDetail, CreateAssignmentDto, PaginatedAssignmentsResponse, UpdateAssignmentDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::assignments::service::AssignmentService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_scope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, PaginationMeta};
use crate::validator::ValidatedJson;

/// List assignments visible to the requester
#[utoipa::path(
    get,
    path = "/api/assignments",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated assignment listing", body = PaginatedAssignmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignments"
)]
#[instrument(skip(state))]
pub async fn get_assignments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedAssignmentsResponse>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let (assignments, total) =
        AssignmentService::list_assignments(&state.db, &scope, &params).await?;

    Ok(Json(PaginatedAssignmentsResponse {
        data: assignments,
        meta: PaginationMeta::new(params.page(), params.page_size(), total),
    }))
}

/// Get a single assignment
#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment details", body = AssignmentDetail),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Assignment not found or out of scope", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignments"
)]
#[instrument(skip(state))]
pub async fn get_assignment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentDetail>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let assignment = AssignmentService::get_assignment(&state.db, &scope, id).await?;
    Ok(Json(assignment))
}

/// Create an assignment (teacher or admin)
#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentDetail),
        (status = 400, description = "Bad request - missing references", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignments"
)]
#[instrument(skip(state, dto))]
pub async fn create_assignment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<(StatusCode, Json<AssignmentDetail>), AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let assignment = AssignmentService::create_assignment(&state.db, &scope, dto).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Update an assignment (admin, or the owning teacher)
#[utoipa::path(
    put,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentDetail),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Assignment not found or out of scope", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignments"
)]
#[instrument(skip(state, dto))]
pub async fn update_assignment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentDto>,
) -> Result<Json<AssignmentDetail>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let assignment = AssignmentService::update_assignment(&state.db, &scope, id, dto).await?;
    Ok(Json(assignment))
}

/// Delete an assignment (admin, or the owning teacher)
#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Assignment not found or out of scope", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Assignments"
)]
#[instrument(skip(state))]
pub async fn delete_assignment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    AssignmentService::delete_assignment(&state.db, &scope, id).await?;
    Ok(Json(json!({"message": "Assignment deleted successfully"})))
}
