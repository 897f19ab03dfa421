use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;

use loket_auth_types::token::{JwtSecret, issue_access_token};
use loket_domain::user::UserRole;

use crate::domain::repository::{PasswordPort, UserRepository};
use crate::domain::types::{MIN_PASSWORD_LEN, Organization, User, validate_email};
use crate::error::TicketingServiceError;

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub profile_pic: Option<String>,
    pub organization: Organization,
}

pub struct RegisterUseCase<U, P>
where
    U: UserRepository,
    P: PasswordPort,
{
    pub users: U,
    pub passwords: P,
}

impl<U, P> RegisterUseCase<U, P>
where
    U: UserRepository,
    P: PasswordPort,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<User, TicketingServiceError> {
        if input.role == UserRole::Admin {
            return Err(TicketingServiceError::Forbidden);
        }
        let username = input.username.trim();
        let name = input.name.trim();
        let email = input.email.trim().to_lowercase();
        if username.is_empty()
            || name.is_empty()
            || !validate_email(&email)
            || input.password.chars().count() < MIN_PASSWORD_LEN
        {
            return Err(TicketingServiceError::InvalidRegistration);
        }
        let organization = match input.role {
            UserRole::Organizer => {
                if input.organization.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                    return Err(TicketingServiceError::InvalidRegistration);
                }
                Some(input.organization)
            }
            _ => None,
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(TicketingServiceError::UserAlreadyExists);
        }

        let password_hash = self.passwords.hash(&input.password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_owned(),
            name: name.to_owned(),
            email,
            password_hash,
            role: input.role,
            profile_pic: input.profile_pic,
            organization,
            register_status: input.role.initial_register_status(),
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginOutput {
    pub access_token: String,
    /// Unix seconds.
    pub expires_at: u64,
    pub user: User,
}

pub struct LoginUseCase<U, P>
where
    U: UserRepository,
    P: PasswordPort,
{
    pub users: U,
    pub passwords: P,
    pub secret: JwtSecret,
    pub token_ttl_secs: u64,
}

impl<U, P> LoginUseCase<U, P>
where
    U: UserRepository,
    P: PasswordPort,
{
    pub async fn execute(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutput, TicketingServiceError> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(TicketingServiceError::InvalidCredentials)?;
        if !self.passwords.verify(password, &user.password_hash).await? {
            return Err(TicketingServiceError::InvalidCredentials);
        }
        if !user.can_log_in() {
            return Err(TicketingServiceError::AccountPending);
        }
        let (access_token, expires_at) = issue_access_token(
            user.id,
            user.role,
            self.secret.expose(),
            self.token_ttl_secs,
        )
        .context("sign access token")?;
        tracing::debug!(user_id = %user.id, "login succeeded");
        Ok(LoginOutput {
            access_token,
            expires_at,
            user,
        })
    }
}
