use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{
    AttendanceDetail, CreateAttendanceDto, PaginatedAttendanceResponse, UpdateAttendanceDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::attendance::service::AttendanceService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_scope;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, PaginationMeta};
use crate::validator::ValidatedJson;

/// List attendance records visible to the requester
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated attendance listing", body = PaginatedAttendanceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance_records(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedAttendanceResponse>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let (records, total) = AttendanceService::list_attendance(&state.db, &scope, &params).await?;

    Ok(Json(PaginatedAttendanceResponse {
        data: records,
        meta: PaginationMeta::new(params.page(), params.page_size(), total),
    }))
}

/// Get a single attendance record
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Attendance record details", body = AttendanceDetail),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Record not found or out of scope", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance_record(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AttendanceDetail>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let record = AttendanceService::get_attendance(&state.db, &scope, id).await?;
    Ok(Json(record))
}

/// Mark attendance (teacher or admin)
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendanceDto,
    responses(
        (status = 201, description = "Attendance marked", body = AttendanceDetail),
        (status = 400, description = "Bad request - duplicate record or missing references", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn create_attendance_record(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<(StatusCode, Json<AttendanceDetail>), AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let record = AttendanceService::create_attendance(&state.db, &scope, dto).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update an attendance record (admin, or the class's teacher)
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance record ID")
    ),
    request_body = UpdateAttendanceDto,
    responses(
        (status = 200, description = "Attendance record updated", body = AttendanceDetail),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Record not found or out of scope", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn update_attendance_record(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<AttendanceDetail>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let record = AttendanceService::update_attendance(&state.db, &scope, id, dto).await?;
    Ok(Json(record))
}

/// Delete an attendance record (admin, or the class's teacher)
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Attendance record deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Record not found or out of scope", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn delete_attendance_record(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    AttendanceService::delete_attendance(&state.db, &scope, id).await?;
    Ok(Json(json!({"message": "Attendance record deleted successfully"})))
}
