//! Chalkboard Core - Shared types library.
//!
//! This crate provides common types used across all Chalkboard components:
//! - `api` - REST backend (auth, catalog, checkout)
//! - `client` - Typed API client with auth-state store
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles,
//!   and order/payment statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
