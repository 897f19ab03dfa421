use std::collections::HashSet;

use loket_domain::event::EventStatus;
use loket_domain::user::UserRole;

use loket_ticketing::domain::ticket_code;
use loket_ticketing::error::TicketingServiceError;
use loket_ticketing::usecase::cart::AddToCartUseCase;
use loket_ticketing::usecase::checkout::CheckoutUseCase;
use loket_ticketing::usecase::retry::RetryPolicy;

use crate::helpers::{MemoryStore, fast_retry, test_category, test_event, test_user, venue};

fn checkout(store: &MemoryStore) -> CheckoutUseCase<MemoryStore> {
    CheckoutUseCase {
        store: store.clone(),
        retry: fast_retry(),
    }
}

// ── Success ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_tickets_and_empty_cart() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("VIP", 500_000, 10), ("Regular", 150_000, 100)]);
    let (vip, regular) = (venue.categories[0].id, venue.categories[1].id);
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, vip, 2).await;
    store.put_in_cart(buyer.id, regular, 3).await;

    let receipt = checkout(&store).execute(buyer.id).await.unwrap();

    assert_eq!(receipt.tickets.len(), 5);
    assert_eq!(receipt.total_amount, 2 * 500_000 + 3 * 150_000);
    let codes: HashSet<&str> = receipt.tickets.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes.len(), 5);
    assert!(receipt.tickets.iter().all(|t| ticket_code::is_well_formed(&t.code)));
    assert!(receipt.tickets.iter().all(|t| t.owner_id == buyer.id));

    let state = store.snapshot().await;
    assert!(state.cart_of(buyer.id).is_empty());
    assert_eq!(state.category(vip).sold, 2);
    assert_eq!(state.category(regular).sold, 3);
    assert_eq!(state.tickets_of(buyer.id).len(), 5);
    assert_eq!(state.transactions.len(), 1);
    assert_eq!(state.transactions[0].total_amount, receipt.total_amount);
    assert_eq!(state.transactions[0].status, "completed");
}

#[tokio::test]
async fn should_record_one_transaction_per_event() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Day 1", 100_000, 10)]);
    let day1 = venue.categories[0].id;
    let mut inventory = venue.inventory(vec![buyer.clone()]);

    let other_event = test_event(venue.organizer.id, EventStatus::Approved);
    let other = test_category(other_event.id, "Day 2", 75_000, 10);
    let other_id = other.id;
    inventory.events.push(other_event.clone());
    inventory.categories.push(other);

    let store = MemoryStore::new(inventory);
    store.put_in_cart(buyer.id, day1, 1).await;
    store.put_in_cart(buyer.id, other_id, 2).await;

    let receipt = checkout(&store).execute(buyer.id).await.unwrap();

    assert_eq!(receipt.transactions.len(), 2);
    let per_event = |event_id: uuid::Uuid| {
        receipt
            .transactions
            .iter()
            .find(|t| t.event_id == event_id)
            .map(|t| t.total_amount)
    };
    assert_eq!(per_event(venue.event.id), Some(100_000));
    assert_eq!(per_event(other_event.id), Some(150_000));
    assert_eq!(receipt.total_amount, 250_000);
}

#[tokio::test]
async fn should_sell_exactly_up_to_quota() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Last seats", 50_000, 3)]);
    let seats = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, seats, 3).await;

    let receipt = checkout(&store).execute(buyer.id).await.unwrap();

    assert_eq!(receipt.tickets.len(), 3);
    let state = store.snapshot().await;
    assert_eq!(state.category(seats).sold, 3);
    assert_eq!(state.category(seats).remaining(), 0);
}

// ── Atomicity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_leave_everything_untouched_when_one_line_is_sold_out() {
    let buyer = test_user(UserRole::Attendee);
    let mut venue = venue(&[("A", 100_000, 5), ("B", 50_000, 10)]);
    venue.categories[0].sold = 5;
    let (a, b) = (venue.categories[0].id, venue.categories[1].id);
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, a, 1).await;
    store.put_in_cart(buyer.id, b, 1).await;

    let result = checkout(&store).execute(buyer.id).await;

    assert!(
        matches!(&result, Err(TicketingServiceError::InsufficientInventory(d)) if d == "A"),
        "expected InsufficientInventory(A), got {result:?}"
    );
    let state = store.snapshot().await;
    assert_eq!(state.category(a).sold, 5);
    assert_eq!(state.category(b).sold, 0);
    assert_eq!(state.cart_of(buyer.id).len(), 2);
    assert!(state.tickets.is_empty());
    assert!(state.transactions.is_empty());
}

#[tokio::test]
async fn should_reject_empty_cart_without_side_effects() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let store = venue.store(vec![buyer.clone()]);

    let result = checkout(&store).execute(buyer.id).await;

    assert!(matches!(result, Err(TicketingServiceError::EmptyCart)));
    let state = store.snapshot().await;
    assert!(state.tickets.is_empty());
    assert!(state.transactions.is_empty());
    assert_eq!(store.begins(), 1);
}

#[tokio::test]
async fn should_not_touch_other_carts() {
    let buyer = test_user(UserRole::Attendee);
    let neighbour = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone(), neighbour.clone()]);
    store.put_in_cart(buyer.id, regular, 1).await;
    store.put_in_cart(neighbour.id, regular, 4).await;

    checkout(&store).execute(buyer.id).await.unwrap();

    let state = store.snapshot().await;
    assert!(state.cart_of(buyer.id).is_empty());
    assert_eq!(state.cart_of(neighbour.id).len(), 1);
    assert_eq!(state.cart_of(neighbour.id)[0].quantity, 4);
}

// ── Concurrency ──────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_never_oversell_under_concurrent_checkouts() {
    const QUOTA: i32 = 5;
    const BUYERS: usize = 12;

    let buyers: Vec<_> = (0..BUYERS).map(|_| test_user(UserRole::Attendee)).collect();
    let venue = venue(&[("Front row", 250_000, QUOTA)]);
    let front_row = venue.categories[0].id;
    let store = venue.store(buyers.clone());
    for buyer in &buyers {
        store.put_in_cart(buyer.id, front_row, 1).await;
    }

    let handles: Vec<_> = buyers
        .iter()
        .map(|buyer| {
            let usecase = checkout(&store);
            let owner = buyer.id;
            tokio::spawn(async move { usecase.execute(owner).await })
        })
        .collect();

    let mut succeeded = 0;
    let mut sold_out = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(TicketingServiceError::InsufficientInventory(_)) => sold_out += 1,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(succeeded, QUOTA as usize);
    assert_eq!(sold_out, BUYERS - QUOTA as usize);
    let state = store.snapshot().await;
    assert_eq!(state.category(front_row).sold, QUOTA);
    assert_eq!(state.tickets.len(), QUOTA as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_give_last_seat_to_exactly_one_buyer() {
    let first = test_user(UserRole::Attendee);
    let second = test_user(UserRole::Attendee);
    let mut venue = venue(&[("Last seat", 100_000, 10)]);
    venue.categories[0].sold = 9;
    let seat = venue.categories[0].id;
    let store = venue.store(vec![first.clone(), second.clone()]);
    store.put_in_cart(first.id, seat, 1).await;
    store.put_in_cart(second.id, seat, 1).await;

    let (left, right) = (checkout(&store), checkout(&store));
    let (a, b) = tokio::join!(left.execute(first.id), right.execute(second.id));

    assert_eq!(u8::from(a.is_ok()) + u8::from(b.is_ok()), 1);
    assert_eq!(store.snapshot().await.category(seat).sold, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_not_issue_twice_for_concurrent_checkouts_of_same_cart() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("VIP", 500_000, 10), ("Regular", 150_000, 100)]);
    let (vip, regular) = (venue.categories[0].id, venue.categories[1].id);
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, vip, 2).await;
    store.put_in_cart(buyer.id, regular, 1).await;

    let (left, right) = (checkout(&store), checkout(&store));
    let (a, b) = tokio::join!(left.execute(buyer.id), right.execute(buyer.id));

    let outcomes = [a, b];
    let receipts: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].tickets.len(), 3);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(TicketingServiceError::EmptyCart)))
    );

    let state = store.snapshot().await;
    assert_eq!(state.tickets_of(buyer.id).len(), 3);
    assert_eq!(state.category(vip).sold, 2);
    assert_eq!(state.category(regular).sold, 1);
    assert_eq!(state.transactions.len(), 1);
    assert!(state.cart_of(buyer.id).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_keep_cart_additions_made_during_checkout() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("VIP", 500_000, 10), ("Regular", 150_000, 100)]);
    let (vip, regular) = (venue.categories[0].id, venue.categories[1].id);
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, vip, 1).await;

    let usecase = checkout(&store);
    let add = AddToCartUseCase {
        cart: store.clone(),
        events: store.clone(),
    };
    let (receipt, more_vip, new_regular) = tokio::join!(
        usecase.execute(buyer.id),
        add.execute(buyer.id, vip, 2),
        add.execute(buyer.id, regular, 3),
    );
    let receipt = receipt.unwrap();
    more_vip.unwrap();
    new_regular.unwrap();

    // Every added seat is either ticketed or still waiting in the cart.
    let state = store.snapshot().await;
    let issued = receipt.tickets.len() as i32;
    let in_cart: i32 = state.cart_of(buyer.id).iter().map(|l| l.quantity).sum();
    assert_eq!(issued + in_cart, 6);
    assert_eq!(state.tickets_of(buyer.id).len(), receipt.tickets.len());
    assert_eq!(
        state.category(vip).sold + state.category(regular).sold,
        issued
    );
}

// ── Retry ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_retry_conflicts_transparently() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, regular, 2).await;
    store.fail_next_commits(2);

    let receipt = checkout(&store).execute(buyer.id).await.unwrap();

    assert_eq!(receipt.tickets.len(), 2);
    assert_eq!(store.begins(), 3);
    let state = store.snapshot().await;
    assert_eq!(state.category(regular).sold, 2);
    assert_eq!(state.tickets.len(), 2);
    assert_eq!(state.transactions.len(), 1);
}

#[tokio::test]
async fn should_surface_conflict_after_attempts_run_out() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, regular, 2).await;
    store.fail_next_commits(10);

    let usecase = CheckoutUseCase {
        store: store.clone(),
        retry: RetryPolicy::new(2, std::time::Duration::from_millis(1)),
    };
    let result = usecase.execute(buyer.id).await;

    assert!(matches!(result, Err(TicketingServiceError::Conflict)));
    assert_eq!(store.begins(), 2);
    let state = store.snapshot().await;
    assert_eq!(state.category(regular).sold, 0);
    assert!(state.tickets.is_empty());
    assert_eq!(state.cart_of(buyer.id).len(), 1);
}
