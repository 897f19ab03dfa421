//! Domain types shared across Loket crates.
//!
//! Pure enums and parsing helpers with no framework dependencies. Database
//! rows store these as short lowercase strings; JSON uses the same spelling.

pub mod event;
pub mod ticket;
pub mod user;

/// Returned when a stored or wire string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
