//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Account role.
///
/// Wire format: `"attendee"`, `"eo"` (event organizer), `"admin"`.
/// The organizer spelling is kept short because it is what issued tokens and
/// stored rows carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "attendee")]
    Attendee,
    #[serde(rename = "eo")]
    Organizer,
    #[serde(rename = "admin")]
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attendee => "attendee",
            Self::Organizer => "eo",
            Self::Admin => "admin",
        }
    }

    /// Registration status a freshly registered account starts with.
    ///
    /// Organizers wait for an admin; everybody else can log in right away.
    pub fn initial_register_status(self) -> RegisterStatus {
        match self {
            Self::Organizer => RegisterStatus::Pending,
            Self::Attendee | Self::Admin => RegisterStatus::Approved,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attendee" => Ok(Self::Attendee),
            "eo" => Ok(Self::Organizer),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownVariant::new("user role", s)),
        }
    }
}

/// Organizer registration lifecycle: `pending --verify--> approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    Pending,
    Approved,
}

impl RegisterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for RegisterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegisterStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            _ => Err(UnknownVariant::new("register status", s)),
        }
    }
}
