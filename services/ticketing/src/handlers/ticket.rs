use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loket_auth_types::identity::AuthIdentity;
use loket_domain::ticket::TicketStatus;

use crate::domain::types::Ticket;
use crate::error::TicketingServiceError;
use crate::state::AppState;
use crate::usecase::ticket::{
    CheckInUseCase, GetTicketUseCase, IssueTicketsInput, IssueTicketsUseCase, ListTicketsUseCase,
};

#[derive(Serialize)]
pub struct TicketResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_category_id: Uuid,
    pub owner_id: Uuid,
    pub code: String,
    pub status: TicketStatus,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            event_id: ticket.event_id,
            ticket_category_id: ticket.ticket_category_id,
            owner_id: ticket.owner_id,
            code: ticket.code,
            status: ticket.status,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

// ── POST /api/tickets ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IssueTicketsRequest {
    pub event_id: Uuid,
    pub ticket_category_id: Uuid,
    pub quantity: i32,
    pub owner_id: Option<Uuid>,
}

pub async fn issue_tickets(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Json(body): Json<IssueTicketsRequest>,
) -> Result<(StatusCode, Json<Vec<TicketResponse>>), TicketingServiceError> {
    let usecase = IssueTicketsUseCase {
        store: state.inventory_store(),
        events: state.event_repo(),
        users: state.user_repo(),
        retry: state.checkout_retry,
    };
    let tickets = usecase
        .execute(
            identity,
            IssueTicketsInput {
                event_id: body.event_id,
                ticket_category_id: body.ticket_category_id,
                quantity: body.quantity,
                owner_id: body.owner_id,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(tickets.into_iter().map(TicketResponse::from).collect()),
    ))
}

// ── GET /api/tickets ─────────────────────────────────────────────────────────

pub async fn list_tickets(
    identity: AuthIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketResponse>>, TicketingServiceError> {
    let usecase = ListTicketsUseCase {
        tickets: state.ticket_repo(),
    };
    let tickets = usecase.execute(identity.user_id).await?;
    Ok(Json(tickets.into_iter().map(TicketResponse::from).collect()))
}

// ── GET /api/tickets/{id} ────────────────────────────────────────────────────

pub async fn get_ticket(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketResponse>, TicketingServiceError> {
    let usecase = GetTicketUseCase {
        tickets: state.ticket_repo(),
    };
    let ticket = usecase.execute(identity.user_id, ticket_id).await?;
    Ok(Json(ticket.into()))
}

// ── PATCH /api/tickets/{id}/checkin ──────────────────────────────────────────

pub async fn check_in(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketResponse>, TicketingServiceError> {
    let usecase = CheckInUseCase {
        tickets: state.ticket_repo(),
        events: state.event_repo(),
    };
    let ticket = usecase.execute(identity, ticket_id).await?;
    Ok(Json(ticket.into()))
}
