use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use loket_domain::user::UserRole;

use crate::domain::types::Organization;
use crate::error::TicketingServiceError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{LoginUseCase, RegisterInput, RegisterUseCase};

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
    pub profile_pic: Option<String>,
    pub organization: Option<String>,
    pub organization_type: Option<String>,
    pub organization_description: Option<String>,
    pub identity_number: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::Attendee
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), TicketingServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        passwords: state.password_hasher(),
    };
    let user = usecase
        .execute(RegisterInput {
            username: body.username,
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
            profile_pic: body.profile_pic,
            organization: Organization {
                name: body.organization,
                kind: body.organization_type,
                description: body.organization_description,
                identity_number: body.identity_number,
            },
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Unix seconds.
    pub expires_at: u64,
    pub user: UserResponse,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, TicketingServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        passwords: state.password_hasher(),
        secret: state.jwt_secret.clone(),
        token_ttl_secs: state.token_ttl_secs,
    };
    let output = usecase.execute(&body.email, &body.password).await?;
    Ok(Json(LoginResponse {
        access_token: output.access_token,
        token_type: "Bearer",
        expires_at: output.expires_at,
        user: output.user.into(),
    }))
}
