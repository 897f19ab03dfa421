//! Identity types shared across Loket crates.
//!
//! Provides bearer JWT validation (and, behind the `issuer` feature, signing)
//! plus the [`identity::AuthIdentity`] extractor.

pub mod identity;
pub mod token;
