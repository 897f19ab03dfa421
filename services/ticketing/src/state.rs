use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use loket_auth_types::token::JwtSecret;

use crate::infra::db::{
    DbCartRepository, DbEventRepository, DbInventoryStore, DbTicketRepository,
    DbTransactionRepository, DbUserRepository,
};
use crate::infra::password::Argon2PasswordHasher;
use crate::usecase::retry::RetryPolicy;

/// Shared application state passed to every handler via axum `State`.
///
/// The connection and the JWT secret are also extractable on their own
/// (`State<DatabaseConnection>`, the bearer-token extractor).
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: JwtSecret,
    #[from_ref(skip)]
    pub token_ttl_secs: u64,
    #[from_ref(skip)]
    pub checkout_retry: RetryPolicy,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn event_repo(&self) -> DbEventRepository {
        DbEventRepository {
            db: self.db.clone(),
        }
    }

    pub fn cart_repo(&self) -> DbCartRepository {
        DbCartRepository {
            db: self.db.clone(),
        }
    }

    pub fn ticket_repo(&self) -> DbTicketRepository {
        DbTicketRepository {
            db: self.db.clone(),
        }
    }

    pub fn transaction_repo(&self) -> DbTransactionRepository {
        DbTransactionRepository {
            db: self.db.clone(),
        }
    }

    pub fn inventory_store(&self) -> DbInventoryStore {
        DbInventoryStore {
            db: self.db.clone(),
        }
    }

    pub fn password_hasher(&self) -> Argon2PasswordHasher {
        Argon2PasswordHasher
    }
}
