//! User account management commands.
//!
//! # Usage
//!
//! ```bash
//! chalk-cli user create -e ada@example.com -n "Ada Lovelace" -r instructor -p '...'
//! ```
//!
//! # Environment Variables
//!
//! - `CHALKBOARD_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use chalkboard_core::{Email, UserRole};

/// Errors that can occur during user management.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: student, instructor")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// An account with this email already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Password hashing error")]
    PasswordHash,
}

/// Create a user account.
///
/// # Errors
///
/// Returns `UserError` for an invalid role/email, a duplicate email, or a
/// database failure.
pub async fn create(email: &str, name: &str, role: &str, password: &str) -> Result<(), UserError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| UserError::InvalidEmail(e.to_string()))?;
    let role = role
        .parse::<UserRole>()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| UserError::PasswordHash)?
        .to_string();

    let database_url = std::env::var("CHALKBOARD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| UserError::MissingEnvVar("CHALKBOARD_DATABASE_URL"))?;

    let pool = PgPool::connect(&database_url).await?;

    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4)",
    )
    .bind(name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role)
    .execute(&pool)
    .await;

    match result {
        Ok(_) => {
            tracing::info!(email = %email, role = %role, "user created");
            Ok(())
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(UserError::UserExists(email.into_inner()))
        }
        Err(e) => Err(UserError::Database(e)),
    }
}
