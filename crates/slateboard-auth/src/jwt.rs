use chrono::Utc;
use jsonwebtoken::errors::{Error, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::claims::{Claims, REFRESH_TOKEN_TYPE, RefreshClaims};

pub fn create_access_token(
    user_id: Uuid,
    username: &str,
    role: &str,
    secret: &str,
    expiry_secs: i64,
) -> Result<String, Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role: role.to_string(),
        exp: (now + expiry_secs) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_refresh_token(
    user_id: Uuid,
    secret: &str,
    expiry_secs: i64,
) -> Result<String, Error> {
    let now = Utc::now().timestamp();
    let claims = RefreshClaims {
        sub: user_id.to_string(),
        token_type: REFRESH_TOKEN_TYPE.to_string(),
        exp: (now + expiry_secs) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Verify a refresh token, rejecting access tokens passed in its place.
pub fn verify_refresh_token(token: &str, secret: &str) -> Result<RefreshClaims, Error> {
    let claims = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)?;

    if claims.token_type != REFRESH_TOKEN_TYPE {
        return Err(Error::from(ErrorKind::InvalidToken));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_access_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "jdoe", "teacher", SECRET, 3600).unwrap();
        let claims = verify_access_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "jdoe");
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_refresh_token(user_id, SECRET, 604800).unwrap();
        let claims = verify_refresh_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, REFRESH_TOKEN_TYPE);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_access_token(Uuid::new_v4(), "jdoe", "admin", SECRET, 3600).unwrap();
        assert!(verify_access_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        // Access tokens carry no token_type claim, so the decode into
        // RefreshClaims must fail.
        let token = create_access_token(Uuid::new_v4(), "jdoe", "admin", SECRET, 3600).unwrap();
        assert!(verify_refresh_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = create_access_token(Uuid::new_v4(), "jdoe", "admin", SECRET, -120).unwrap();
        assert!(verify_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for token in ["", "not.enough", "a.b.c.d.e", "!!!.???.###"] {
            assert!(verify_access_token(token, SECRET).is_err());
        }
    }
}
