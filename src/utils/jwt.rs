//! Thin adapters over `slateboard-auth`, binding the token helpers to the
//! application's [`JwtConfig`] and [`AppError`].

use slateboard_auth::claims::{Claims, RefreshClaims};
use crate::modules::users::model::UserRole;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::utils::errors::AppError;

pub fn create_access_token(
    user_id: Uuid,
    username: &str,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    slateboard_auth::jwt::create_access_token(
        user_id,
        username,
        role.as_str(),
        &jwt_config.secret,
        jwt_config.access_token_expiry,
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create access token: {}", e)))
}

pub fn create_refresh_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, AppError> {
    slateboard_auth::jwt::create_refresh_token(
        user_id,
        &jwt_config.secret,
        jwt_config.refresh_token_expiry,
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create refresh token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    slateboard_auth::jwt::verify_access_token(token, &jwt_config.secret)
        .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshClaims, AppError> {
    slateboard_auth::jwt::verify_refresh_token(token, &jwt_config.secret)
        .map_err(|_| AppError::unauthorized("Invalid or expired refresh token".to_string()))
}
