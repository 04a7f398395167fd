use serde::{Deserialize, Serialize};

/// Marker value carried in the `token_type` claim of refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    /// Role slug: `admin`, `teacher`, `student` or `staff`.
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Claims carried by a refresh token.
///
/// Deliberately minimal: role and username are re-read from the database
/// when the token is exchanged, so a role change invalidates nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub token_type: String,
    pub exp: usize,
    pub iat: usize,
}
