use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::students::model::Student;
use crate::modules::teachers::model::Teacher;
use crate::modules::users::model::{
    ConvertToStudentDto, ConvertToTeacherDto, PaginatedUsersResponse, ProfileResponse,
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::{ListParams, PaginationMeta};
use crate::validator::ValidatedJson;

/// List users with pagination and search (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated user listing", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let (users, total) = UserService::list_users(&state.db, &params).await?;

    Ok(Json(PaginatedUsersResponse {
        data: users.into_iter().map(ProfileResponse::from).collect(),
        meta: PaginationMeta::new(params.page(), params.page_size(), total),
    }))
}

/// Get a single user by id (admin only)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(ProfileResponse::from(user)))
}

/// Get the authenticated user's own profile
#[utoipa::path(
    get,
    path = "/api/profile/me",
    responses(
        (status = 200, description = "Current user's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = UserService::get_user(&state.db, auth_user.user_id()?).await?;
    Ok(Json(ProfileResponse::from(user)))
}

/// Convert an existing user to a teacher (admin only)
#[utoipa::path(
    post,
    path = "/api/users/convert-to-teacher",
    request_body = ConvertToTeacherDto,
    responses(
        (status = 201, description = "User converted to teacher", body = Teacher),
        (status = 400, description = "Bad request - user already a teacher or duplicate employee id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn convert_to_teacher(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ConvertToTeacherDto>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = UserService::convert_to_teacher(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

/// Convert an existing user to a student (admin only)
#[utoipa::path(
    post,
    path = "/api/users/convert-to-student",
    request_body = ConvertToStudentDto,
    responses(
        (status = 201, description = "User converted to student", body = Student),
        (status = 400, description = "Bad request - user already a student or duplicate identifiers", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn convert_to_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ConvertToStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = UserService::convert_to_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}
