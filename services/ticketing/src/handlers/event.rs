use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loket_auth_types::identity::AuthIdentity;
use loket_domain::event::EventStatus;

use crate::domain::types::{Event, EventDetail, TicketCategory};
use crate::error::TicketingServiceError;
use crate::state::AppState;
use crate::usecase::event::{
    AddTicketCategoryUseCase, CreateEventUseCase, DeleteEventUseCase, EventInput,
    GetEventUseCase, ListEventsUseCase, TicketCategoryInput, UpdateEventUseCase,
    VerifyEventUseCase,
};

// ── Request / response bodies ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EventRequest {
    pub name: String,
    #[serde(deserialize_with = "loket_core::serde::from_rfc3339_or_date")]
    pub date_start: DateTime<Utc>,
    #[serde(deserialize_with = "loket_core::serde::from_rfc3339_or_date")]
    pub date_end: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    pub flyer: Option<String>,
    #[serde(default)]
    pub category: String,
}

impl From<EventRequest> for EventInput {
    fn from(body: EventRequest) -> Self {
        Self {
            name: body.name,
            date_start: body.date_start,
            date_end: body.date_end,
            location: body.location,
            description: body.description,
            image: body.image,
            flyer: body.flyer,
            category: body.category,
        }
    }
}

#[derive(Deserialize)]
pub struct TicketCategoryRequest {
    pub price: i64,
    pub quota: i32,
    pub description: String,
    #[serde(deserialize_with = "loket_core::serde::from_rfc3339_or_date")]
    pub date_start: DateTime<Utc>,
    #[serde(deserialize_with = "loket_core::serde::from_rfc3339_or_date")]
    pub date_end: DateTime<Utc>,
}

impl From<TicketCategoryRequest> for TicketCategoryInput {
    fn from(body: TicketCategoryRequest) -> Self {
        Self {
            price: body.price,
            quota: body.quota,
            description: body.description,
            date_start: body.date_start,
            date_end: body.date_end,
        }
    }
}

#[derive(Serialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub status: EventStatus,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub date_start: DateTime<Utc>,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub date_end: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub image: Option<String>,
    pub flyer: Option<String>,
    pub category: String,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            owner_id: event.owner_id,
            name: event.name,
            status: event.status,
            date_start: event.date_start,
            date_end: event.date_end,
            location: event.location,
            description: event.description,
            image: event.image,
            flyer: event.flyer,
            category: event.category,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct TicketCategoryResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub price: i64,
    pub quota: i32,
    pub sold: i32,
    pub remaining: i32,
    pub description: String,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub date_start: DateTime<Utc>,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub date_end: DateTime<Utc>,
}

impl From<TicketCategory> for TicketCategoryResponse {
    fn from(category: TicketCategory) -> Self {
        Self {
            remaining: category.remaining(),
            id: category.id,
            event_id: category.event_id,
            price: category.price,
            quota: category.quota,
            sold: category.sold,
            description: category.description,
            date_start: category.date_start,
            date_end: category.date_end,
        }
    }
}

#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub categories: Vec<TicketCategoryResponse>,
}

impl From<EventDetail> for EventDetailResponse {
    fn from(detail: EventDetail) -> Self {
        Self {
            event: detail.event.into(),
            categories: detail.categories.into_iter().map(Into::into).collect(),
        }
    }
}

// ── GET /api/events ──────────────────────────────────────────────────────────

pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, TicketingServiceError> {
    let usecase = ListEventsUseCase {
        events: state.event_repo(),
    };
    let events = usecase.execute().await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

// ── GET /api/events/{id} ─────────────────────────────────────────────────────

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetailResponse>, TicketingServiceError> {
    let usecase = GetEventUseCase {
        events: state.event_repo(),
    };
    let detail = usecase.execute(event_id).await?;
    Ok(Json(detail.into()))
}

// ── POST /api/events ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEventRequest {
    #[serde(flatten)]
    pub event: EventRequest,
    #[serde(default)]
    pub categories: Vec<TicketCategoryRequest>,
}

pub async fn create_event(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDetailResponse>), TicketingServiceError> {
    let usecase = CreateEventUseCase {
        events: state.event_repo(),
    };
    let detail = usecase
        .execute(
            identity,
            body.event.into(),
            body.categories.into_iter().map(Into::into).collect(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

// ── PUT /api/events/{id} ─────────────────────────────────────────────────────

pub async fn update_event(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<EventRequest>,
) -> Result<Json<EventResponse>, TicketingServiceError> {
    let usecase = UpdateEventUseCase {
        events: state.event_repo(),
    };
    let event = usecase.execute(identity, event_id, body.into()).await?;
    Ok(Json(event.into()))
}

// ── DELETE /api/events/{id} ──────────────────────────────────────────────────

pub async fn delete_event(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, TicketingServiceError> {
    let usecase = DeleteEventUseCase {
        events: state.event_repo(),
    };
    usecase.execute(identity, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /api/events/{id}/verify ────────────────────────────────────────────

pub async fn verify_event(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventResponse>, TicketingServiceError> {
    let usecase = VerifyEventUseCase {
        events: state.event_repo(),
    };
    let event = usecase.execute(identity, event_id).await?;
    Ok(Json(event.into()))
}

// ── POST /api/events/{id}/categories ─────────────────────────────────────────

pub async fn add_ticket_category(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<TicketCategoryRequest>,
) -> Result<(StatusCode, Json<TicketCategoryResponse>), TicketingServiceError> {
    let usecase = AddTicketCategoryUseCase {
        events: state.event_repo(),
    };
    let category = usecase.execute(identity, event_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}
