use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loket_auth_types::identity::AuthIdentity;
use loket_domain::user::{RegisterStatus, UserRole};

use crate::domain::types::User;
use crate::error::TicketingServiceError;
use crate::state::AppState;
use crate::usecase::user::{
    GetProfileUseCase, ListUsersUseCase, UpdateProfileInput, UpdateProfileUseCase,
    VerifyUserUseCase,
};

#[derive(Serialize)]
pub struct OrganizationResponse {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub identity_number: Option<String>,
}

/// Public view of an account. Never carries the password hash.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile_pic: Option<String>,
    pub organization: Option<OrganizationResponse>,
    pub register_status: RegisterStatus,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            role: user.role,
            profile_pic: user.profile_pic,
            organization: user.organization.map(|o| OrganizationResponse {
                name: o.name,
                kind: o.kind,
                description: o.description,
                identity_number: o.identity_number,
            }),
            register_status: user.register_status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /api/users/profile ───────────────────────────────────────────────────

pub async fn get_profile(
    identity: AuthIdentity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, TicketingServiceError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PUT /api/users/profile ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub profile_pic: Option<String>,
}

pub async fn update_profile(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, TicketingServiceError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                name: body.name,
                profile_pic: body.profile_pic,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    identity: AuthIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, TicketingServiceError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(identity).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /api/users/{id}/verify ──────────────────────────────────────────────

pub async fn verify_user(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, TicketingServiceError> {
    let usecase = VerifyUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity, user_id).await?;
    Ok(Json(user.into()))
}
