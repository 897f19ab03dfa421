use uuid::Uuid;

use loket_auth_types::identity::AuthIdentity;
use loket_domain::user::{RegisterStatus, UserRole};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::TicketingServiceError;

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, TicketingServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(TicketingServiceError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub profile_pic: Option<String>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, TicketingServiceError> {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if name.is_none() && input.profile_pic.is_none() {
            return Err(TicketingServiceError::MissingData);
        }
        self.users
            .update_profile(user_id, name, input.profile_pic.as_deref())
            .await?
            .ok_or(TicketingServiceError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(
        &self,
        identity: AuthIdentity,
    ) -> Result<Vec<User>, TicketingServiceError> {
        if !identity.is_admin() {
            return Err(TicketingServiceError::Forbidden);
        }
        self.users.list().await
    }
}

// ── VerifyUser ───────────────────────────────────────────────────────────────

pub struct VerifyUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> VerifyUserUseCase<U> {
    /// Approves an organizer registration. Approving twice is a no-op.
    pub async fn execute(
        &self,
        identity: AuthIdentity,
        user_id: Uuid,
    ) -> Result<User, TicketingServiceError> {
        if !identity.is_admin() {
            return Err(TicketingServiceError::Forbidden);
        }
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(TicketingServiceError::UserNotFound)?;
        if user.role != UserRole::Organizer {
            return Err(TicketingServiceError::NotOrganizer);
        }
        if user.register_status != RegisterStatus::Approved {
            if !self
                .users
                .set_register_status(user_id, RegisterStatus::Approved)
                .await?
            {
                return Err(TicketingServiceError::UserNotFound);
            }
            user.register_status = RegisterStatus::Approved;
            tracing::info!(%user_id, by = %identity.user_id, "organizer verified");
        }
        Ok(user)
    }
}
