//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::request::Parts;
use uuid::Uuid;

use loket_domain::user::UserRole;

use crate::token::{AuthError, JwtSecret, validate_access_token};

/// Authenticated caller, resolved from `Authorization: Bearer <jwt>`.
///
/// Rejects with 401 when the header is absent or the token does not validate.
/// Role checks (403) are the handler's job.
#[derive(Debug, Clone, Copy)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// True only for the organizer identified by `owner_id`.
    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.role == UserRole::Organizer && self.user_id == owner_id
    }

    /// True for admins and for the organizer identified by `owner_id`.
    pub fn manages(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.owns(owner_id)
    }
}

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AuthError;

    // Header and secret are read synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let bearer = parts.headers.typed_get::<Authorization<Bearer>>();

        async move {
            let bearer = bearer.ok_or(AuthError::MissingToken)?;
            let info = validate_access_token(bearer.token(), secret.expose())
                .inspect_err(|e| tracing::debug!(error = %e, "bearer token rejected"))?;
            Ok(Self {
                user_id: info.user_id,
                role: info.role,
            })
        }
    }
}
