//! Checkout orchestration error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::paypal::GatewayError;

/// Errors that can occur while orchestrating a checkout.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Missing or malformed checkout input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No order with the given id.
    #[error("order cannot be found")]
    OrderNotFound,

    /// No course with the given id.
    #[error("course cannot be found")]
    CourseNotFound,

    /// The payment provider rejected or failed the call.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
