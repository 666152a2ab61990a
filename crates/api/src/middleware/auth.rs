//! Bearer-token authentication extractors.
//!
//! Stateless: every protected request carries `Authorization: Bearer <jwt>`
//! and the extractor verifies it against the configured signing secret. A 401
//! from any of these tells the client to drop its stored token and
//! re-authenticate.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use chalkboard_core::UserRole;

use crate::services::auth::{AuthError, token};
use crate::state::AppState;

/// The verified identity attached to an authenticated request.
pub use crate::services::auth::TokenIdentity as CurrentUser;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", user.user_id)
/// }
/// ```
#[derive(Debug)]
pub struct RequireAuth(pub CurrentUser);

/// Extractor that additionally requires the instructor role.
#[derive(Debug)]
pub struct RequireInstructor(pub CurrentUser);

/// Rejection for failed authentication or authorization.
pub enum AuthRejection {
    /// No usable token on the request.
    MissingToken,
    /// Token malformed, expired, or wrongly signed.
    InvalidToken,
    /// Valid token, wrong role.
    NotInstructor,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "Unauthorized - token missing"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            // 403, not 401: the client should not drop its credentials
            Self::NotInstructor => (StatusCode::FORBIDDEN, "Instructor access required"),
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

/// Pull and verify the bearer token from the request headers.
fn verify_bearer(parts: &Parts, state: &AppState) -> Result<CurrentUser, AuthRejection> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthRejection::MissingToken)?;

    token::verify(token, &state.config().jwt_secret).map_err(|e| match e {
        AuthError::MissingToken => AuthRejection::MissingToken,
        _ => AuthRejection::InvalidToken,
    })
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        verify_bearer(parts, state).map(Self)
    }
}

impl FromRequestParts<AppState> for RequireInstructor {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = verify_bearer(parts, state)?;

        if user.role != UserRole::Instructor {
            return Err(AuthRejection::NotInstructor);
        }

        Ok(Self(user))
    }
}
