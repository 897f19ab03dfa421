//! Service plumbing shared by Loket binaries: configuration loading, tracing
//! setup, HTTP middleware, health probes and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
