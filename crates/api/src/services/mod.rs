//! Business logic services.
//!
//! - [`auth`] - registration, login, bearer-token issue/verify
//! - [`orders`] - the checkout orchestrator: payment-provider calls
//!   sequenced with ledger persistence

pub mod auth;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use orders::{OrderError, OrderService};
