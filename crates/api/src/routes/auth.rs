//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use chalkboard_core::UserRole;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::UserProfile;
use crate::routes::Envelope;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

/// Login payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_email: Option<String>,
    pub password: Option<String>,
}

/// Token plus public user, returned by register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub user: UserProfile,
}

/// Create an account.
///
/// POST /api/auth/register
///
/// Issues a token immediately so the client lands signed-in after
/// registration.
///
/// # Errors
///
/// 400 for missing fields, invalid email, weak password, or an email that is
/// already registered.
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<AuthPayload>>)> {
    let (Some(name), Some(email), Some(password)) =
        (request.user_name, request.user_email, request.password)
    else {
        return Err(AppError::Validation(
            "userName, userEmail, and password are required".to_string(),
        ));
    };

    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let authenticated = auth
        .register(
            &name,
            &email,
            &password,
            request.role.unwrap_or_default(),
        )
        .await?;

    tracing::info!(user_id = %authenticated.user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Envelope::with_message(
            "User registered successfully",
            AuthPayload {
                access_token: authenticated.access_token,
                user: authenticated.user,
            },
        ),
    ))
}

/// Login with email and password.
///
/// POST /api/auth/login
///
/// # Errors
///
/// 401 for an unknown email or wrong password; no token is issued.
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Envelope<AuthPayload>>> {
    let (Some(email), Some(password)) = (request.user_email, request.password) else {
        return Err(AppError::Validation(
            "userEmail and password are required".to_string(),
        ));
    };

    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let authenticated = auth.login(&email, &password).await?;

    Ok(Envelope::with_message(
        "Login successful",
        AuthPayload {
            access_token: authenticated.access_token,
            user: authenticated.user,
        },
    ))
}

/// The current user's public profile.
///
/// GET /api/users/me (bearer)
///
/// # Errors
///
/// 401 for a missing/invalid token or a deleted account.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Envelope<UserProfile>>> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let profile = auth.profile(current.user_id).await?;

    Ok(Envelope::data(profile))
}
