use uuid::Uuid;

use crate::domain::repository::{CartRepository, EventRepository};
use crate::domain::types::CartLine;
use crate::error::TicketingServiceError;

// ── AddToCart ────────────────────────────────────────────────────────────────

/// Adds to the caller's cart. Quota is not checked until checkout.
pub struct AddToCartUseCase<C, E>
where
    C: CartRepository,
    E: EventRepository,
{
    pub cart: C,
    pub events: E,
}

impl<C, E> AddToCartUseCase<C, E>
where
    C: CartRepository,
    E: EventRepository,
{
    pub async fn execute(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
        quantity: i32,
    ) -> Result<(), TicketingServiceError> {
        if quantity <= 0 {
            return Err(TicketingServiceError::InvalidQuantity);
        }
        self.events
            .find_category(ticket_category_id)
            .await?
            .ok_or(TicketingServiceError::CategoryNotFound)?;
        self.cart.add(owner, ticket_category_id, quantity).await
    }
}

// ── UpdateCartLine ───────────────────────────────────────────────────────────

pub struct UpdateCartLineUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> UpdateCartLineUseCase<C> {
    /// Replaces the quantity; zero or less removes the line.
    pub async fn execute(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
        quantity: i32,
    ) -> Result<(), TicketingServiceError> {
        let found = if quantity <= 0 {
            self.cart.remove(owner, ticket_category_id).await?
        } else {
            self.cart
                .set_quantity(owner, ticket_category_id, quantity)
                .await?
        };
        if !found {
            return Err(TicketingServiceError::CartLineNotFound);
        }
        Ok(())
    }
}

// ── RemoveFromCart ───────────────────────────────────────────────────────────

pub struct RemoveFromCartUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> RemoveFromCartUseCase<C> {
    pub async fn execute(
        &self,
        owner: Uuid,
        ticket_category_id: Uuid,
    ) -> Result<(), TicketingServiceError> {
        if !self.cart.remove(owner, ticket_category_id).await? {
            return Err(TicketingServiceError::CartLineNotFound);
        }
        Ok(())
    }
}

// ── ListCart ─────────────────────────────────────────────────────────────────

pub struct ListCartUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> ListCartUseCase<C> {
    pub async fn execute(&self, owner: Uuid) -> Result<Vec<CartLine>, TicketingServiceError> {
        self.cart.list(owner).await
    }
}
