use axum::{Json, extract::State};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::dashboard::model::DashboardStats;
use crate::modules::dashboard::service::DashboardService;
use crate::state::AppState;
use crate::utils::auth_helpers::resolve_scope;
use crate::utils::errors::AppError;

/// Role-dependent dashboard statistics
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Statistics for the requester's role", body = DashboardStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<DashboardStats>, AppError> {
    let scope = resolve_scope(&state.db, &auth_user).await?;
    let stats = DashboardService::stats(&state.db, &scope).await?;
    Ok(Json(stats))
}
