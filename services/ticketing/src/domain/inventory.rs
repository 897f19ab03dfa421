//! Quota arithmetic for ticket issuance.
//!
//! Everything here is pure: callers load and lock the categories, then ask
//! [`allocate`] whether the requested quantities fit before mutating
//! anything.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::types::{CartLine, TicketCategory};
use crate::error::TicketingServiceError;

/// Requested quantity of one ticket category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demand {
    pub ticket_category_id: Uuid,
    pub quantity: i32,
}

impl From<&CartLine> for Demand {
    fn from(line: &CartLine) -> Self {
        Self {
            ticket_category_id: line.ticket_category_id,
            quantity: line.quantity,
        }
    }
}

/// A validated slice of inventory: `quantity` more tickets of `category`
/// fit under its quota.
#[derive(Debug, Clone)]
pub struct Allocation {
    pub category: TicketCategory,
    pub quantity: i32,
}

impl Allocation {
    pub fn amount(&self) -> i64 {
        self.category
            .price
            .saturating_mul(i64::from(self.quantity))
    }
}

/// Sorted, de-duplicated category ids referenced by `demands`.
///
/// Rows must be locked in this order so concurrent multi-category
/// issuances cannot deadlock on each other.
pub fn lock_order(demands: &[Demand]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = demands.iter().map(|d| d.ticket_category_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Check every demand against the loaded categories.
///
/// Quantities for the same category are summed first. Returns one
/// allocation per category ordered by id, or the first violation found:
/// a non-positive quantity, an unknown category, or a total that would
/// push `sold` past `quota` (overflow included).
pub fn allocate(
    demands: &[Demand],
    categories: &[TicketCategory],
) -> Result<Vec<Allocation>, TicketingServiceError> {
    let mut wanted: BTreeMap<Uuid, i32> = BTreeMap::new();
    for demand in demands {
        if demand.quantity <= 0 {
            return Err(TicketingServiceError::InvalidQuantity);
        }
        let total = wanted.entry(demand.ticket_category_id).or_insert(0);
        *total = total.saturating_add(demand.quantity);
    }

    let by_id: BTreeMap<Uuid, &TicketCategory> = categories.iter().map(|c| (c.id, c)).collect();

    let mut allocations = Vec::with_capacity(wanted.len());
    for (category_id, quantity) in wanted {
        let category = by_id
            .get(&category_id)
            .ok_or(TicketingServiceError::CategoryNotFound)?;
        let fits = category
            .sold
            .checked_add(quantity)
            .is_some_and(|after| after <= category.quota);
        if !fits {
            return Err(TicketingServiceError::InsufficientInventory(
                category.description.clone(),
            ));
        }
        allocations.push(Allocation {
            category: (*category).clone(),
            quantity,
        });
    }
    Ok(allocations)
}

/// Sum of allocation amounts per event, ordered by event id.
pub fn totals_by_event(allocations: &[Allocation]) -> Vec<(Uuid, i64)> {
    let mut totals: BTreeMap<Uuid, i64> = BTreeMap::new();
    for allocation in allocations {
        let total = totals.entry(allocation.category.event_id).or_insert(0);
        *total = total.saturating_add(allocation.amount());
    }
    totals.into_iter().collect()
}
