use chrono::Utc;
use uuid::Uuid;

use loket_domain::ticket::TicketStatus;

use crate::domain::inventory::{Allocation, Demand, allocate, lock_order};
use crate::domain::repository::InventoryTx;
use crate::domain::ticket_code;
use crate::domain::types::Ticket;
use crate::error::TicketingServiceError;

pub(crate) struct Issued {
    pub tickets: Vec<Ticket>,
    pub allocations: Vec<Allocation>,
}

/// Lock the demanded categories, check every quota, then create the tickets
/// and bump `sold`. All checks finish before the first write. Nothing is
/// committed here; on error the caller drops `tx`.
///
/// `demands` must be non-empty, or the result is an empty `Issued`.
pub(crate) async fn issue<T: InventoryTx>(
    tx: &mut T,
    owner: Uuid,
    demands: &[Demand],
) -> Result<Issued, TicketingServiceError> {
    let categories = tx.lock_categories(&lock_order(demands)).await?;
    let allocations = allocate(demands, &categories)?;

    let now = Utc::now();
    let tickets: Vec<Ticket> = allocations
        .iter()
        .flat_map(|allocation| {
            (0..allocation.quantity).map(move |_| Ticket {
                id: Uuid::now_v7(),
                event_id: allocation.category.event_id,
                ticket_category_id: allocation.category.id,
                owner_id: owner,
                code: ticket_code::generate(),
                status: TicketStatus::Active,
                created_at: now,
                updated_at: now,
            })
        })
        .collect();
    tx.insert_tickets(&tickets).await?;

    for allocation in &allocations {
        // Rows are locked, so this only trips if the lock was not honoured.
        if !tx
            .increment_sold(allocation.category.id, allocation.quantity)
            .await?
        {
            return Err(TicketingServiceError::InsufficientInventory(
                allocation.category.description.clone(),
            ));
        }
    }

    Ok(Issued {
        tickets,
        allocations,
    })
}
