//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] chalkboard_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// An account with this email already exists.
    #[error("user already exists")]
    EmailTaken,

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No bearer token on the request.
    #[error("token missing")]
    MissingToken,

    /// Token malformed or signature invalid.
    #[error("invalid token")]
    InvalidToken,

    /// Token past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
