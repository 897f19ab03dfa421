#![allow(async_fn_in_trait)]

use uuid::Uuid;

use loket_domain::event::EventStatus;
use loket_domain::user::RegisterStatus;

use crate::domain::types::{CartLine, Event, Ticket, TicketCategory, TransactionRecord, User};
use crate::error::TicketingServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, TicketingServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, TicketingServiceError>;

    /// Fails with `UserAlreadyExists` when the email or username is taken.
    async fn create(&self, user: &User) -> Result<(), TicketingServiceError>;

    /// Returns the updated user, or `None` if it does not exist.
    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        profile_pic: Option<&str>,
    ) -> Result<Option<User>, TicketingServiceError>;

    async fn list(&self) -> Result<Vec<User>, TicketingServiceError>;

    /// Returns `true` if a row was updated.
    async fn set_register_status(
        &self,
        id: Uuid,
        status: RegisterStatus,
    ) -> Result<bool, TicketingServiceError>;
}

/// Password hashing. Implementations may offload to a blocking pool.
pub trait PasswordPort: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, TicketingServiceError>;
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, TicketingServiceError>;
}

/// Repository for events and their ticket categories.
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, TicketingServiceError>;
    async fn list_approved(&self) -> Result<Vec<Event>, TicketingServiceError>;
    async fn list_categories(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<TicketCategory>, TicketingServiceError>;
    async fn find_category(
        &self,
        id: Uuid,
    ) -> Result<Option<TicketCategory>, TicketingServiceError>;

    /// Insert the event and its initial categories atomically.
    async fn create(
        &self,
        event: &Event,
        categories: &[TicketCategory],
    ) -> Result<(), TicketingServiceError>;

    async fn update(&self, event: &Event) -> Result<(), TicketingServiceError>;

    /// Returns `true` if a row was updated.
    async fn set_status(
        &self,
        id: Uuid,
        status: EventStatus,
    ) -> Result<bool, TicketingServiceError>;

    async fn add_category(&self, category: &TicketCategory) -> Result<(), TicketingServiceError>;

    /// Delete the event unless any of its categories has sold tickets, in
    /// which case `EventHasSales`. Categories and cart lines cascade.
    /// Returns `true` if a row was deleted.
    async fn delete_unsold(&self, id: Uuid) -> Result<bool, TicketingServiceError>;
}

/// Repository for cart lines outside of checkout.
pub trait CartRepository: Send + Sync {
    async fn list(&self, owner: Uuid) -> Result<Vec<CartLine>, TicketingServiceError>;

    /// Insert the line or add `quantity` to the existing one, atomically.
    async fn add(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
        quantity: i32,
    ) -> Result<(), TicketingServiceError>;

    /// Replace the quantity of an existing line. Returns `true` if it existed.
    async fn set_quantity(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
        quantity: i32,
    ) -> Result<bool, TicketingServiceError>;

    /// Returns `true` if a line was deleted.
    async fn remove(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
    ) -> Result<bool, TicketingServiceError>;
}

/// Repository for issued tickets.
pub trait TicketRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, TicketingServiceError>;
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Ticket>, TicketingServiceError>;

    /// Flip `active` to `used`. Returns `false` if the ticket was not active,
    /// so concurrent check-ins see exactly one `true`.
    async fn mark_used(&self, id: Uuid) -> Result<bool, TicketingServiceError>;
}

/// Repository for the purchase ledger.
pub trait TransactionRepository: Send + Sync {
    async fn list_by_owner(
        &self,
        owner: Uuid,
    ) -> Result<Vec<TransactionRecord>, TicketingServiceError>;
}

/// Opens units of work over inventory, carts and tickets.
pub trait InventoryStore: Send + Sync {
    type Tx: InventoryTx;

    async fn begin(&self) -> Result<Self::Tx, TicketingServiceError>;
}

/// One atomic unit of work. Nothing is visible to others until
/// [`InventoryTx::commit`]; dropping the value rolls everything back.
///
/// Contention surfaces as `Conflict` from any method and the caller may
/// restart the whole unit of work.
pub trait InventoryTx: Send {
    /// Load and row-lock the owner's cart lines, ordered by category.
    async fn cart_lines(&mut self, owner: Uuid) -> Result<Vec<CartLine>, TicketingServiceError>;

    /// Load and row-lock the given categories for the rest of the unit of
    /// work. `ids` arrive sorted; missing ids are simply absent.
    async fn lock_categories(
        &mut self,
        ids: &[Uuid],
    ) -> Result<Vec<TicketCategory>, TicketingServiceError>;

    async fn insert_tickets(&mut self, tickets: &[Ticket]) -> Result<(), TicketingServiceError>;

    /// `sold += quantity` only while the result stays within quota.
    /// Returns `false` and changes nothing otherwise.
    async fn increment_sold(
        &mut self,
        ticket_category_id: Uuid,
        quantity: i32,
    ) -> Result<bool, TicketingServiceError>;

    async fn record_transaction(
        &mut self,
        record: &TransactionRecord,
    ) -> Result<(), TicketingServiceError>;

    /// Delete exactly `lines` from the owner's cart. `Conflict` if any of
    /// them is already gone; lines added since the load are kept.
    async fn clear_cart(
        &mut self,
        owner: Uuid,
        lines: &[CartLine],
    ) -> Result<(), TicketingServiceError>;

    async fn commit(self) -> Result<(), TicketingServiceError>;
}
