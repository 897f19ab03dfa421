use uuid::Uuid;

use loket_auth_types::identity::AuthIdentity;
use loket_domain::ticket::TicketStatus;

use crate::domain::inventory::Demand;
use crate::domain::repository::{
    EventRepository, InventoryStore, InventoryTx, TicketRepository, UserRepository,
};
use crate::domain::types::Ticket;
use crate::error::TicketingServiceError;
use crate::usecase::issuance::issue;
use crate::usecase::retry::RetryPolicy;

// ── IssueTickets ─────────────────────────────────────────────────────────────

pub struct IssueTicketsInput {
    pub event_id: Uuid,
    pub ticket_category_id: Uuid,
    pub quantity: i32,
    /// Recipient; defaults to the caller.
    pub owner_id: Option<Uuid>,
}

/// Direct issuance by staff, bypassing the cart but not the quota.
pub struct IssueTicketsUseCase<S, E, U>
where
    S: InventoryStore,
    E: EventRepository,
    U: UserRepository,
{
    pub store: S,
    pub events: E,
    pub users: U,
    pub retry: RetryPolicy,
}

impl<S, E, U> IssueTicketsUseCase<S, E, U>
where
    S: InventoryStore,
    E: EventRepository,
    U: UserRepository,
{
    pub async fn execute(
        &self,
        identity: AuthIdentity,
        input: IssueTicketsInput,
    ) -> Result<Vec<Ticket>, TicketingServiceError> {
        if input.quantity <= 0 {
            return Err(TicketingServiceError::InvalidQuantity);
        }
        let event = self
            .events
            .find_by_id(input.event_id)
            .await?
            .ok_or(TicketingServiceError::EventNotFound)?;
        if !identity.manages(event.owner_id) {
            return Err(TicketingServiceError::Forbidden);
        }
        self.events
            .find_category(input.ticket_category_id)
            .await?
            .filter(|c| c.event_id == event.id)
            .ok_or(TicketingServiceError::CategoryNotFound)?;

        let owner = match input.owner_id {
            Some(owner_id) => {
                self.users
                    .find_by_id(owner_id)
                    .await?
                    .ok_or(TicketingServiceError::UserNotFound)?
                    .id
            }
            None => identity.user_id,
        };

        let demand = Demand {
            ticket_category_id: input.ticket_category_id,
            quantity: input.quantity,
        };
        let tickets = self
            .retry
            .run("issue_tickets", move || self.attempt(owner, demand))
            .await?;
        tracing::info!(
            issuer = %identity.user_id,
            %owner,
            event_id = %event.id,
            count = tickets.len(),
            "tickets issued"
        );
        Ok(tickets)
    }

    async fn attempt(
        &self,
        owner: Uuid,
        demand: Demand,
    ) -> Result<Vec<Ticket>, TicketingServiceError> {
        let mut tx = self.store.begin().await?;
        let issued = issue(&mut tx, owner, &[demand]).await?;
        tx.commit().await?;
        Ok(issued.tickets)
    }
}

// ── CheckIn ──────────────────────────────────────────────────────────────────

pub struct CheckInUseCase<T, E>
where
    T: TicketRepository,
    E: EventRepository,
{
    pub tickets: T,
    pub events: E,
}

impl<T, E> CheckInUseCase<T, E>
where
    T: TicketRepository,
    E: EventRepository,
{
    pub async fn execute(
        &self,
        identity: AuthIdentity,
        ticket_id: Uuid,
    ) -> Result<Ticket, TicketingServiceError> {
        let mut ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or(TicketingServiceError::TicketNotFound)?;
        let event = self
            .events
            .find_by_id(ticket.event_id)
            .await?
            .ok_or(TicketingServiceError::EventNotFound)?;
        if !identity.manages(event.owner_id) {
            return Err(TicketingServiceError::Forbidden);
        }
        if ticket.status.is_used() {
            return Err(TicketingServiceError::AlreadyUsed);
        }
        // Lost a race with another check-in between the read and the update.
        if !self.tickets.mark_used(ticket_id).await? {
            return Err(TicketingServiceError::AlreadyUsed);
        }
        ticket.status = TicketStatus::Used;
        ticket.updated_at = chrono::Utc::now();
        tracing::info!(ticket_id = %ticket.id, by = %identity.user_id, "ticket checked in");
        Ok(ticket)
    }
}

// ── ListTickets ──────────────────────────────────────────────────────────────

pub struct ListTicketsUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> ListTicketsUseCase<T> {
    pub async fn execute(&self, owner: Uuid) -> Result<Vec<Ticket>, TicketingServiceError> {
        self.tickets.list_by_owner(owner).await
    }
}

// ── GetTicket ────────────────────────────────────────────────────────────────

pub struct GetTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> GetTicketUseCase<T> {
    /// Tickets of other users are reported as missing.
    pub async fn execute(
        &self,
        owner: Uuid,
        ticket_id: Uuid,
    ) -> Result<Ticket, TicketingServiceError> {
        self.tickets
            .find_by_id(ticket_id)
            .await?
            .filter(|t| t.owner_id == owner)
            .ok_or(TicketingServiceError::TicketNotFound)
    }
}
