use loket_auth_types::token::validate_access_token;
use loket_domain::user::{RegisterStatus, UserRole};
use loket_testing::{MockAuth, TEST_JWT_SECRET};

use loket_ticketing::domain::types::Organization;
use loket_ticketing::error::TicketingServiceError;
use loket_ticketing::usecase::auth::{LoginUseCase, RegisterInput, RegisterUseCase};
use loket_ticketing::usecase::user::{
    ListUsersUseCase, UpdateProfileInput, UpdateProfileUseCase, VerifyUserUseCase,
};

use crate::helpers::{Inventory, MemoryStore, PlainPasswords, test_user};

fn register(store: &MemoryStore) -> RegisterUseCase<MemoryStore, PlainPasswords> {
    RegisterUseCase {
        users: store.clone(),
        passwords: PlainPasswords,
    }
}

fn login(store: &MemoryStore) -> LoginUseCase<MemoryStore, PlainPasswords> {
    LoginUseCase {
        users: store.clone(),
        passwords: PlainPasswords,
        secret: MockAuth::secret(),
        token_ttl_secs: 600,
    }
}

fn attendee_input(email: &str) -> RegisterInput {
    RegisterInput {
        username: "sari".into(),
        name: "Sari".into(),
        email: email.into(),
        password: "correct-horse".into(),
        role: UserRole::Attendee,
        profile_pic: None,
        organization: Organization::default(),
    }
}

fn organizer_input(email: &str) -> RegisterInput {
    RegisterInput {
        username: "gigs".into(),
        name: "Gigs Co".into(),
        role: UserRole::Organizer,
        organization: Organization {
            name: Some("Gigs Co".into()),
            kind: Some("company".into()),
            description: None,
            identity_number: Some("01.234.567.8-901.000".into()),
        },
        ..attendee_input(email)
    }
}

// ── RegisterUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_attendee_with_normalised_email() {
    let store = MemoryStore::default();

    let user = register(&store)
        .execute(attendee_input("  Sari@Example.COM "))
        .await
        .unwrap();

    assert_eq!(user.email, "sari@example.com");
    assert_eq!(user.register_status, RegisterStatus::Approved);
    assert_ne!(user.password_hash, "correct-horse");
    assert!(user.organization.is_none());
    assert_eq!(store.snapshot().await.users.len(), 1);
}

#[tokio::test]
async fn should_register_organizer_as_pending() {
    let store = MemoryStore::default();

    let user = register(&store)
        .execute(organizer_input("gigs@example.com"))
        .await
        .unwrap();

    assert_eq!(user.register_status, RegisterStatus::Pending);
    assert_eq!(
        user.organization.and_then(|o| o.name).as_deref(),
        Some("Gigs Co")
    );
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let store = MemoryStore::default();
    register(&store)
        .execute(attendee_input("sari@example.com"))
        .await
        .unwrap();

    let result = register(&store)
        .execute(RegisterInput {
            username: "sari2".into(),
            ..attendee_input("SARI@example.com")
        })
        .await;

    assert!(matches!(result, Err(TicketingServiceError::UserAlreadyExists)));
}

#[tokio::test]
async fn should_reject_invalid_registrations() {
    let store = MemoryStore::default();
    let cases = [
        RegisterInput {
            password: "short".into(),
            ..attendee_input("a@example.com")
        },
        attendee_input("not-an-email"),
        RegisterInput {
            name: "   ".into(),
            ..attendee_input("b@example.com")
        },
        RegisterInput {
            organization: Organization::default(),
            ..organizer_input("c@example.com")
        },
    ];

    for input in cases {
        let result = register(&store).execute(input).await;
        assert!(
            matches!(result, Err(TicketingServiceError::InvalidRegistration)),
            "got {result:?}"
        );
    }
    assert!(store.snapshot().await.users.is_empty());
}

#[tokio::test]
async fn should_refuse_self_registered_admins() {
    let store = MemoryStore::default();

    let result = register(&store)
        .execute(RegisterInput {
            role: UserRole::Admin,
            ..attendee_input("root@example.com")
        })
        .await;

    assert!(matches!(result, Err(TicketingServiceError::Forbidden)));
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_token_for_valid_credentials() {
    let store = MemoryStore::default();
    let user = register(&store)
        .execute(attendee_input("sari@example.com"))
        .await
        .unwrap();

    let output = login(&store)
        .execute("Sari@Example.com", "correct-horse")
        .await
        .unwrap();

    assert_eq!(output.user.id, user.id);
    let info = validate_access_token(&output.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
    assert_eq!(info.role, UserRole::Attendee);
}

#[tokio::test]
async fn should_reject_wrong_password_and_unknown_email_alike() {
    let store = MemoryStore::default();
    register(&store)
        .execute(attendee_input("sari@example.com"))
        .await
        .unwrap();

    let wrong = login(&store).execute("sari@example.com", "battery-staple").await;
    let unknown = login(&store).execute("nobody@example.com", "correct-horse").await;

    assert!(matches!(wrong, Err(TicketingServiceError::InvalidCredentials)));
    assert!(matches!(unknown, Err(TicketingServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn should_block_pending_organizer_until_verified() {
    let store = MemoryStore::default();
    let organizer = register(&store)
        .execute(organizer_input("gigs@example.com"))
        .await
        .unwrap();

    let pending = login(&store).execute("gigs@example.com", "correct-horse").await;
    assert!(matches!(pending, Err(TicketingServiceError::AccountPending)));

    VerifyUserUseCase {
        users: store.clone(),
    }
    .execute(MockAuth::admin().identity(), organizer.id)
    .await
    .unwrap();

    let output = login(&store)
        .execute("gigs@example.com", "correct-horse")
        .await
        .unwrap();
    assert_eq!(output.user.register_status, RegisterStatus::Approved);
}

// ── User administration ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_restrict_user_administration_to_admins() {
    let organizer = test_user(UserRole::Organizer);
    let store = MemoryStore::new(Inventory {
        users: vec![organizer.clone()],
        ..Inventory::default()
    });

    let list = ListUsersUseCase {
        users: store.clone(),
    };
    assert!(matches!(
        list.execute(MockAuth::organizer().identity()).await,
        Err(TicketingServiceError::Forbidden)
    ));
    assert_eq!(list.execute(MockAuth::admin().identity()).await.unwrap().len(), 1);

    let verify = VerifyUserUseCase {
        users: store.clone(),
    };
    assert!(matches!(
        verify
            .execute(MockAuth::attendee().identity(), organizer.id)
            .await,
        Err(TicketingServiceError::Forbidden)
    ));
}

#[tokio::test]
async fn should_refuse_to_verify_non_organizers() {
    let attendee = test_user(UserRole::Attendee);
    let store = MemoryStore::new(Inventory {
        users: vec![attendee.clone()],
        ..Inventory::default()
    });

    let result = VerifyUserUseCase {
        users: store.clone(),
    }
    .execute(MockAuth::admin().identity(), attendee.id)
    .await;

    assert!(matches!(result, Err(TicketingServiceError::NotOrganizer)));
}

#[tokio::test]
async fn should_update_profile_fields_that_were_sent() {
    let user = test_user(UserRole::Attendee);
    let store = MemoryStore::new(Inventory {
        users: vec![user.clone()],
        ..Inventory::default()
    });
    let update = UpdateProfileUseCase {
        users: store.clone(),
    };

    let updated = update
        .execute(
            user.id,
            UpdateProfileInput {
                name: None,
                profile_pic: Some("https://cdn.example.com/me.png".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, user.name);
    assert_eq!(
        updated.profile_pic.as_deref(),
        Some("https://cdn.example.com/me.png")
    );

    let empty = update
        .execute(
            user.id,
            UpdateProfileInput {
                name: Some("  ".into()),
                profile_pic: None,
            },
        )
        .await;
    assert!(matches!(empty, Err(TicketingServiceError::MissingData)));
}
