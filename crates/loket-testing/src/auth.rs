//! Mock identities for router tests.
//!
//! Services authenticate with an HS256 bearer token. `MockAuth` signs one
//! with [`TEST_JWT_SECRET`] so tests can hit protected routes without a
//! login round trip.

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use loket_auth_types::identity::AuthIdentity;
use loket_auth_types::token::{JwtSecret, issue_access_token};
use loket_domain::user::UserRole;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "loket-test-secret";

/// Configurable identity injected into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn attendee() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Attendee)
    }

    pub fn organizer() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Organizer)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Admin)
    }

    /// The identity the bearer-token extractor would resolve to.
    pub fn identity(&self) -> AuthIdentity {
        AuthIdentity {
            user_id: self.user_id,
            role: self.role,
        }
    }

    pub fn secret() -> JwtSecret {
        JwtSecret::new(TEST_JWT_SECRET)
    }

    /// Signed token valid for one hour.
    pub fn token(&self) -> String {
        let (token, _) = issue_access_token(self.user_id, self.role, TEST_JWT_SECRET, 3600)
            .expect("sign test token");
        token
    }

    /// `Authorization: Bearer <token>` header value.
    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).expect("valid header value")
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.bearer());
        map
    }
}
