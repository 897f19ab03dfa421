//! Test utilities for Loket services.
//!
//! Import from dev-dependencies only; never from production code.

pub mod auth;

pub use auth::{MockAuth, TEST_JWT_SECRET};
