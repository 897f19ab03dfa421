use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use loket_domain::event::EventStatus;
use loket_domain::user::UserRole;
use loket_testing::MockAuth;

use loket_ticketing::error::TicketingServiceError;
use loket_ticketing::usecase::event::{
    AddTicketCategoryUseCase, CreateEventUseCase, DeleteEventUseCase, EventInput,
    GetEventUseCase, ListEventsUseCase, TicketCategoryInput, UpdateEventUseCase,
    VerifyEventUseCase,
};

use crate::helpers::{MemoryStore, test_event, venue};

fn event_input() -> EventInput {
    EventInput {
        name: "Jazz Night".into(),
        date_start: Utc.with_ymd_and_hms(2026, 12, 5, 19, 0, 0).unwrap(),
        date_end: Utc.with_ymd_and_hms(2026, 12, 5, 23, 0, 0).unwrap(),
        location: "Jakarta".into(),
        description: "Live jazz".into(),
        image: None,
        flyer: None,
        category: "music".into(),
    }
}

fn category_input(description: &str, price: i64, quota: i32) -> TicketCategoryInput {
    TicketCategoryInput {
        price,
        quota,
        description: description.into(),
        date_start: Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap(),
        date_end: Utc.with_ymd_and_hms(2026, 12, 5, 0, 0, 0).unwrap(),
    }
}

// ── CreateEventUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_pending_event_with_categories() {
    let store = MemoryStore::default();
    let organizer = MockAuth::organizer();

    let detail = CreateEventUseCase {
        events: store.clone(),
    }
    .execute(
        organizer.identity(),
        event_input(),
        vec![
            category_input("VIP", 500_000, 10),
            category_input("Regular", 150_000, 100),
        ],
    )
    .await
    .unwrap();

    assert_eq!(detail.event.status, EventStatus::Pending);
    assert_eq!(detail.event.owner_id, organizer.user_id);
    assert_eq!(detail.categories.len(), 2);
    assert!(detail.categories.iter().all(|c| c.sold == 0));
    let state = store.snapshot().await;
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.categories.len(), 2);
}

#[tokio::test]
async fn should_only_let_organizers_create_events() {
    let store = MemoryStore::default();
    let create = CreateEventUseCase {
        events: store.clone(),
    };

    for identity in [MockAuth::attendee(), MockAuth::admin()] {
        let result = create
            .execute(identity.identity(), event_input(), vec![])
            .await;
        assert!(matches!(result, Err(TicketingServiceError::Forbidden)));
    }
}

#[tokio::test]
async fn should_reject_invalid_schedules_and_tiers() {
    let store = MemoryStore::default();
    let create = CreateEventUseCase {
        events: store.clone(),
    };
    let organizer = MockAuth::organizer().identity();

    let backwards = EventInput {
        date_end: event_input().date_start - Duration::hours(1),
        ..event_input()
    };
    assert!(matches!(
        create.execute(organizer, backwards, vec![]).await,
        Err(TicketingServiceError::InvalidSchedule)
    ));

    let cases = [
        (category_input("Free", -1, 10), "INVALID_PRICE"),
        (category_input("Broken", 10_000, -5), "INVALID_QUANTITY"),
        (category_input("  ", 10_000, 5), "MISSING_DATA"),
    ];
    for (tier, kind) in cases {
        let result = create.execute(organizer, event_input(), vec![tier]).await;
        assert_eq!(result.unwrap_err().kind(), kind);
    }
    assert!(store.snapshot().await.events.is_empty());
}

// ── Update / AddTicketCategory ───────────────────────────────────────────────

#[tokio::test]
async fn should_restrict_event_edits_to_owner() {
    let venue = venue(&[("Regular", 100_000, 10)]);
    let store = venue.store(vec![]);
    let owner = MockAuth::new(venue.organizer.id, UserRole::Organizer);
    let update = UpdateEventUseCase {
        events: store.clone(),
    };

    for outsider in [MockAuth::organizer(), MockAuth::admin()] {
        let result = update
            .execute(outsider.identity(), venue.event.id, event_input())
            .await;
        assert!(matches!(result, Err(TicketingServiceError::Forbidden)));
    }

    let renamed = update
        .execute(
            owner.identity(),
            venue.event.id,
            EventInput {
                name: "Jazz Night II".into(),
                ..event_input()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Jazz Night II");
    assert_eq!(renamed.status, EventStatus::Approved);
    assert_eq!(store.snapshot().await.events[0].name, "Jazz Night II");
}

#[tokio::test]
async fn should_add_category_to_own_event() {
    let venue = venue(&[]);
    let store = venue.store(vec![]);
    let owner = MockAuth::new(venue.organizer.id, UserRole::Organizer);

    let category = AddTicketCategoryUseCase {
        events: store.clone(),
    }
    .execute(
        owner.identity(),
        venue.event.id,
        category_input("Early bird", 90_000, 50),
    )
    .await
    .unwrap();

    assert_eq!(category.event_id, venue.event.id);
    assert_eq!(category.remaining(), 50);
    let detail = GetEventUseCase {
        events: store.clone(),
    }
    .execute(venue.event.id)
    .await
    .unwrap();
    assert_eq!(detail.categories.len(), 1);
}

// ── DeleteEventUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_event_without_sales() {
    let venue = venue(&[("Regular", 100_000, 10)]);
    let store = venue.store(vec![]);
    store
        .put_in_cart(Uuid::now_v7(), venue.categories[0].id, 2)
        .await;
    let owner = MockAuth::new(venue.organizer.id, UserRole::Organizer);

    DeleteEventUseCase {
        events: store.clone(),
    }
    .execute(owner.identity(), venue.event.id)
    .await
    .unwrap();

    let state = store.snapshot().await;
    assert!(state.events.is_empty());
    assert!(state.categories.is_empty());
    assert!(state.cart.is_empty());
}

#[tokio::test]
async fn should_keep_event_with_sales() {
    let mut venue = venue(&[("Regular", 100_000, 10)]);
    venue.categories[0].sold = 1;
    let store = venue.store(vec![]);
    let owner = MockAuth::new(venue.organizer.id, UserRole::Organizer);

    let result = DeleteEventUseCase {
        events: store.clone(),
    }
    .execute(owner.identity(), venue.event.id)
    .await;

    assert!(matches!(result, Err(TicketingServiceError::EventHasSales)));
    assert_eq!(store.snapshot().await.events.len(), 1);
}

// ── Verify / List / Get ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_verified_events() {
    let venue = venue(&[]);
    let pending = test_event(venue.organizer.id, EventStatus::Pending);
    let mut inventory = venue.inventory(vec![]);
    inventory.events.push(pending.clone());
    let store = MemoryStore::new(inventory);
    let list = ListEventsUseCase {
        events: store.clone(),
    };

    assert_eq!(list.execute().await.unwrap().len(), 1);

    let verify = VerifyEventUseCase {
        events: store.clone(),
    };
    assert!(matches!(
        verify
            .execute(MockAuth::organizer().identity(), pending.id)
            .await,
        Err(TicketingServiceError::Forbidden)
    ));
    let admin = MockAuth::admin().identity();
    let approved = verify.execute(admin, pending.id).await.unwrap();
    assert_eq!(approved.status, EventStatus::Approved);
    // Second approval is a no-op.
    verify.execute(admin, pending.id).await.unwrap();

    assert_eq!(list.execute().await.unwrap().len(), 2);
}

#[tokio::test]
async fn should_report_missing_event() {
    let store = MemoryStore::default();

    let result = GetEventUseCase {
        events: store.clone(),
    }
    .execute(Uuid::now_v7())
    .await;

    assert!(matches!(result, Err(TicketingServiceError::EventNotFound)));
}
