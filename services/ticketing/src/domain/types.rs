use chrono::{DateTime, Utc};
use uuid::Uuid;

use loket_domain::event::EventStatus;
use loket_domain::ticket::TicketStatus;
use loket_domain::user::{RegisterStatus, UserRole};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Status written on every purchase ledger row. No payment is captured.
pub const TRANSACTION_COMPLETED: &str = "completed";

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub profile_pic: Option<String>,
    pub organization: Option<Organization>,
    pub register_status: RegisterStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Organizers must be verified by an admin before they can log in.
    pub fn can_log_in(&self) -> bool {
        self.role != UserRole::Organizer || self.register_status == RegisterStatus::Approved
    }
}

/// Organizer details supplied at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub identity_number: Option<String>,
}

/// Event published by an organizer.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub status: EventStatus,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub image: Option<String>,
    pub flyer: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sellable tier of an event with a fixed quota.
#[derive(Debug, Clone)]
pub struct TicketCategory {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Smallest currency unit.
    pub price: i64,
    pub quota: i32,
    pub sold: i32,
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketCategory {
    pub fn remaining(&self) -> i32 {
        (self.quota - self.sold).max(0)
    }
}

/// A user's pending request for `quantity` tickets of one category.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub user_id: Uuid,
    pub ticket_category_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_category_id: Uuid,
    pub owner_id: Uuid,
    pub code: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Purchase ledger row, one per event per checkout.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub event_id: Uuid,
    pub total_amount: i64,
    pub status: String,
    pub transaction_time: DateTime<Utc>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub tickets: Vec<Ticket>,
    pub transactions: Vec<TransactionRecord>,
    pub total_amount: i64,
}

/// Event together with its ticket categories.
#[derive(Debug, Clone)]
pub struct EventDetail {
    pub event: Event,
    pub categories: Vec<TicketCategory>,
}

/// `start` must not be after `end`.
pub fn validate_schedule(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= end
}

/// Cheap shape check: one `@` with something on both sides.
pub fn validate_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
