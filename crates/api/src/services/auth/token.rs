//! Bearer-token issue and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and role, valid for seven
//! days. The client holds the token; the server keeps no session state, so a
//! token is "revoked" only by expiring or by the client discarding it.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use chalkboard_core::{UserId, UserRole};

use super::AuthError;

/// Token lifetime: seven days.
const TOKEN_TTL_DAYS: i64 = 7;

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// User role, for downstream authorization checks.
    pub role: UserRole,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// The identity a verified token yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: UserId,
    pub role: UserRole,
}

/// Issue a signed token for the given user.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if signing fails (corrupt key material).
pub fn issue(user_id: UserId, role: UserRole, secret: &SecretString) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.as_i64(),
        role,
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Verify a token and return the identity it encodes.
///
/// # Errors
///
/// Returns `AuthError::TokenExpired` for expired tokens and
/// `AuthError::InvalidToken` for anything malformed or wrongly signed.
pub fn verify(token: &str, secret: &SecretString) -> Result<TokenIdentity, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(TokenIdentity {
        user_id: UserId::new(data.claims.sub),
        role: data.claims.role,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("kY8#mR2$vN5@qT7&wZ1*xC4^bF6!hJ9%")
    }

    #[test]
    fn test_issue_then_verify() {
        let token = issue(UserId::new(42), UserRole::Instructor, &secret()).unwrap();
        let identity = verify(&token, &secret()).unwrap();

        assert_eq!(identity.user_id, UserId::new(42));
        assert_eq!(identity.role, UserRole::Instructor);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue(UserId::new(1), UserRole::Student, &secret()).unwrap();
        let other = SecretString::from("pL3$dG8@sK1&fH5*jM7!nQ2^rV9#tX4%");

        assert!(matches!(
            verify(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            verify("not-a-token", &secret()),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Hand-sign claims already past expiry (beyond the default leeway)
        let now = Utc::now();
        let claims = Claims {
            sub: 1,
            role: UserRole::Student,
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret().expose_secret().as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            verify(&token, &secret()),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_expiry_is_seven_days_out() {
        let token = issue(UserId::new(1), UserRole::Student, &secret()).unwrap();

        // Decode without signature validation to inspect the claims
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        let data = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .unwrap();

        let lifetime = data.claims.exp - data.claims.iat;
        assert_eq!(lifetime, Duration::days(7).num_seconds());
    }
}
