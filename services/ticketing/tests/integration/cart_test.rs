use uuid::Uuid;

use loket_domain::user::UserRole;

use loket_ticketing::error::TicketingServiceError;
use loket_ticketing::usecase::cart::{
    AddToCartUseCase, ListCartUseCase, RemoveFromCartUseCase, UpdateCartLineUseCase,
};

use crate::helpers::{MemoryStore, test_user, venue};

fn add(store: &MemoryStore) -> AddToCartUseCase<MemoryStore, MemoryStore> {
    AddToCartUseCase {
        cart: store.clone(),
        events: store.clone(),
    }
}

// ── AddToCartUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_accumulate_quantity_for_same_category() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);

    add(&store).execute(buyer.id, regular, 2).await.unwrap();
    add(&store).execute(buyer.id, regular, 3).await.unwrap();

    let lines = ListCartUseCase {
        cart: store.clone(),
    }
    .execute(buyer.id)
    .await
    .unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].ticket_category_id, regular);
    assert_eq!(lines[0].quantity, 5);
}

#[tokio::test]
async fn should_allow_cart_beyond_remaining_quota() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Tiny", 100_000, 1)]);
    let tiny = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);

    add(&store).execute(buyer.id, tiny, 4).await.unwrap();

    assert_eq!(store.snapshot().await.cart_of(buyer.id)[0].quantity, 4);
}

#[tokio::test]
async fn should_reject_non_positive_quantity() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);

    for quantity in [0, -1] {
        let result = add(&store).execute(buyer.id, regular, quantity).await;
        assert!(
            matches!(result, Err(TicketingServiceError::InvalidQuantity)),
            "quantity {quantity}: got {result:?}"
        );
    }
    assert!(store.snapshot().await.cart.is_empty());
}

#[tokio::test]
async fn should_reject_unknown_category() {
    let buyer = test_user(UserRole::Attendee);
    let store = venue(&[]).store(vec![buyer.clone()]);

    let result = add(&store).execute(buyer.id, Uuid::now_v7(), 1).await;

    assert!(matches!(result, Err(TicketingServiceError::CategoryNotFound)));
}

// ── UpdateCartLineUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_replace_quantity_of_existing_line() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, regular, 5).await;

    UpdateCartLineUseCase {
        cart: store.clone(),
    }
    .execute(buyer.id, regular, 2)
    .await
    .unwrap();

    assert_eq!(store.snapshot().await.cart_of(buyer.id)[0].quantity, 2);
}

#[tokio::test]
async fn should_remove_line_when_quantity_drops_to_zero() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);
    store.put_in_cart(buyer.id, regular, 5).await;

    UpdateCartLineUseCase {
        cart: store.clone(),
    }
    .execute(buyer.id, regular, 0)
    .await
    .unwrap();

    assert!(store.snapshot().await.cart_of(buyer.id).is_empty());
}

#[tokio::test]
async fn should_fail_update_of_missing_line() {
    let buyer = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone()]);

    let result = UpdateCartLineUseCase {
        cart: store.clone(),
    }
    .execute(buyer.id, regular, 3)
    .await;

    assert!(matches!(result, Err(TicketingServiceError::CartLineNotFound)));
}

// ── RemoveFromCartUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_remove_only_own_line() {
    let buyer = test_user(UserRole::Attendee);
    let other = test_user(UserRole::Attendee);
    let venue = venue(&[("Regular", 100_000, 10)]);
    let regular = venue.categories[0].id;
    let store = venue.store(vec![buyer.clone(), other.clone()]);
    store.put_in_cart(buyer.id, regular, 1).await;
    store.put_in_cart(other.id, regular, 2).await;

    let remove = RemoveFromCartUseCase {
        cart: store.clone(),
    };
    remove.execute(buyer.id, regular).await.unwrap();
    let again = remove.execute(buyer.id, regular).await;

    assert!(matches!(again, Err(TicketingServiceError::CartLineNotFound)));
    let state = store.snapshot().await;
    assert!(state.cart_of(buyer.id).is_empty());
    assert_eq!(state.cart_of(other.id).len(), 1);
}
