use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use slateboard_auth::claims::Claims;
use crate::modules::users::model::UserRole;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// User id parsed from the `sub` claim.
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    /// Role parsed from the `role` claim.
    pub fn role(&self) -> Result<UserRole, AppError> {
        UserRole::parse(&self.0.role)
            .ok_or_else(|| AppError::unauthorized("Invalid role in token".to_string()))
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims_with_role(role: &str) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            username: "test".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_role_parses_from_claims() {
        let auth_user = AuthUser(claims_with_role("teacher"));
        assert_eq!(auth_user.role().unwrap(), UserRole::Teacher);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let auth_user = AuthUser(claims_with_role("superuser"));
        assert!(auth_user.role().is_err());
    }

    #[test]
    fn test_user_id_parses_sub() {
        let user_id = Uuid::new_v4();
        let mut claims = claims_with_role("admin");
        claims.sub = user_id.to_string();
        let auth_user = AuthUser(claims);
        assert_eq!(auth_user.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_garbage_sub_rejected() {
        let mut claims = claims_with_role("admin");
        claims.sub = "not-a-uuid".to_string();
        let auth_user = AuthUser(claims);
        assert!(auth_user.user_id().is_err());
    }
}
