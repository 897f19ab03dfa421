use chrono::Utc;
use uuid::Uuid;

use crate::domain::inventory::{Demand, totals_by_event};
use crate::domain::repository::{InventoryStore, InventoryTx};
use crate::domain::types::{Receipt, TRANSACTION_COMPLETED, TransactionRecord};
use crate::error::TicketingServiceError;
use crate::usecase::issuance::issue;
use crate::usecase::retry::RetryPolicy;

// ── Checkout ─────────────────────────────────────────────────────────────────

/// Turns the caller's whole cart into tickets in one unit of work.
///
/// Either every line is issued, `sold` is bumped, one ledger row per event
/// is written and the cart is emptied, or nothing changes at all.
/// Contention is retried under `retry`.
pub struct CheckoutUseCase<S: InventoryStore> {
    pub store: S,
    pub retry: RetryPolicy,
}

impl<S: InventoryStore> CheckoutUseCase<S> {
    pub async fn execute(&self, owner: Uuid) -> Result<Receipt, TicketingServiceError> {
        let result = self.retry.run("checkout", move || self.attempt(owner)).await;
        match &result {
            Ok(receipt) => tracing::info!(
                %owner,
                tickets = receipt.tickets.len(),
                total_amount = receipt.total_amount,
                "checkout completed"
            ),
            Err(TicketingServiceError::Internal(_)) => {}
            Err(e) => tracing::debug!(%owner, kind = e.kind(), "checkout rejected"),
        }
        result
    }

    async fn attempt(&self, owner: Uuid) -> Result<Receipt, TicketingServiceError> {
        let mut tx = self.store.begin().await?;

        let lines = tx.cart_lines(owner).await?;
        if lines.is_empty() {
            return Err(TicketingServiceError::EmptyCart);
        }
        let demands: Vec<Demand> = lines.iter().map(Demand::from).collect();

        let issued = issue(&mut tx, owner, &demands).await?;

        let now = Utc::now();
        let mut transactions = Vec::new();
        for (event_id, total_amount) in totals_by_event(&issued.allocations) {
            let record = TransactionRecord {
                id: Uuid::now_v7(),
                owner_id: owner,
                event_id,
                total_amount,
                status: TRANSACTION_COMPLETED.to_owned(),
                transaction_time: now,
            };
            tx.record_transaction(&record).await?;
            transactions.push(record);
        }

        tx.clear_cart(owner, &lines).await?;
        tx.commit().await?;

        let total_amount = transactions.iter().map(|t| t.total_amount).sum();
        Ok(Receipt {
            tickets: issued.tickets,
            transactions,
            total_amount,
        })
    }
}
