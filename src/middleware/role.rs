//! Role-based authorization middleware.
//!
//! Roles travel inside the JWT claims, so these checks never touch the
//! database: layer [`require_admin`] over a router subtree, or call the
//! check helpers from a handler when the rule is per-operation.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::modules::users::model::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Reject the request unless the authenticated user has one of
/// `allowed_roles`.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<UserRole>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    let user_role = auth_user.role()?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, user_role
        )));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Layer for admin-only router subtrees.
///
/// ```rust,ignore
/// Router::new()
///     .nest("/users", init_users_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, vec![UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Handler-level check that the user has exactly `required_role`.
pub fn check_role(auth_user: &AuthUser, required_role: UserRole) -> Result<(), AppError> {
    let user_role = auth_user.role()?;

    if user_role != required_role {
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {:?}, but user has role: {:?}",
            required_role, user_role
        )));
    }

    Ok(())
}

/// Handler-level check that the user has one of `allowed_roles`.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    let user_role = auth_user.role()?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, user_role
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slateboard_auth::claims::Claims;
    use uuid::Uuid;

    fn auth_user(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4().to_string(),
            username: "test".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_check_role_exact_match() {
        assert!(check_role(&auth_user("admin"), UserRole::Admin).is_ok());
        assert!(check_role(&auth_user("teacher"), UserRole::Admin).is_err());
    }

    #[test]
    fn test_check_any_role() {
        let allowed = [UserRole::Admin, UserRole::Teacher];
        assert!(check_any_role(&auth_user("teacher"), &allowed).is_ok());
        assert!(check_any_role(&auth_user("admin"), &allowed).is_ok());
        assert!(check_any_role(&auth_user("student"), &allowed).is_err());
        assert!(check_any_role(&auth_user("staff"), &allowed).is_err());
    }

    #[test]
    fn test_invalid_role_claim_fails_checks() {
        assert!(check_role(&auth_user("superuser"), UserRole::Admin).is_err());
        assert!(check_any_role(&auth_user(""), &[UserRole::Admin]).is_err());
    }
}
