//! Integration tests for Chalkboard.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and run migrations
//! cargo run -p chalk-cli -- migrate
//!
//! # Start the API (sandbox PayPal credentials)
//! cargo run -p chalkboard-api
//!
//! # Run integration tests
//! cargo test -p chalkboard-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Registration, login, token verification
//! - `checkout` - Order creation, capture, enrollment ledgers
//!
//! Tests are `#[ignore]`d by default because they need a running server and
//! database; the base URL is read from `CHALKBOARD_BASE_URL`
//! (default `http://localhost:5000`).

/// Base URL for the API under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("CHALKBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A unique email per test run, so reruns never collide on the unique index.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@example.com", uuid::Uuid::new_v4().simple())
}
