use chrono::{DateTime, Utc};
use uuid::Uuid;

use loket_auth_types::identity::AuthIdentity;
use loket_domain::event::EventStatus;
use loket_domain::user::UserRole;

use crate::domain::repository::EventRepository;
use crate::domain::types::{Event, EventDetail, TicketCategory, validate_schedule};
use crate::error::TicketingServiceError;

/// Descriptive event fields, shared by create and update.
pub struct EventInput {
    pub name: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub image: Option<String>,
    pub flyer: Option<String>,
    pub category: String,
}

impl EventInput {
    fn validate(&self) -> Result<(), TicketingServiceError> {
        if self.name.trim().is_empty() || self.location.trim().is_empty() {
            return Err(TicketingServiceError::MissingData);
        }
        if !validate_schedule(self.date_start, self.date_end) {
            return Err(TicketingServiceError::InvalidSchedule);
        }
        Ok(())
    }
}

pub struct TicketCategoryInput {
    pub price: i64,
    pub quota: i32,
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
}

impl TicketCategoryInput {
    fn into_category(
        self,
        event_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TicketCategory, TicketingServiceError> {
        if self.description.trim().is_empty() {
            return Err(TicketingServiceError::MissingData);
        }
        if self.quota < 0 {
            return Err(TicketingServiceError::InvalidQuantity);
        }
        if self.price < 0 {
            return Err(TicketingServiceError::InvalidPrice);
        }
        if !validate_schedule(self.date_start, self.date_end) {
            return Err(TicketingServiceError::InvalidSchedule);
        }
        Ok(TicketCategory {
            id: Uuid::now_v7(),
            event_id,
            price: self.price,
            quota: self.quota,
            sold: 0,
            description: self.description.trim().to_owned(),
            date_start: self.date_start,
            date_end: self.date_end,
            created_at: now,
            updated_at: now,
        })
    }
}

async fn owned_event<E: EventRepository>(
    events: &E,
    identity: AuthIdentity,
    event_id: Uuid,
) -> Result<Event, TicketingServiceError> {
    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or(TicketingServiceError::EventNotFound)?;
    if !identity.owns(event.owner_id) {
        return Err(TicketingServiceError::Forbidden);
    }
    Ok(event)
}

// ── CreateEvent ──────────────────────────────────────────────────────────────

pub struct CreateEventUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> CreateEventUseCase<E> {
    /// New events start `pending` until an admin verifies them.
    pub async fn execute(
        &self,
        identity: AuthIdentity,
        input: EventInput,
        categories: Vec<TicketCategoryInput>,
    ) -> Result<EventDetail, TicketingServiceError> {
        if identity.role != UserRole::Organizer {
            return Err(TicketingServiceError::Forbidden);
        }
        input.validate()?;

        let now = Utc::now();
        let event = Event {
            id: Uuid::now_v7(),
            owner_id: identity.user_id,
            name: input.name.trim().to_owned(),
            status: EventStatus::Pending,
            date_start: input.date_start,
            date_end: input.date_end,
            location: input.location.trim().to_owned(),
            description: input.description,
            image: input.image,
            flyer: input.flyer,
            category: input.category,
            created_at: now,
            updated_at: now,
        };
        let categories = categories
            .into_iter()
            .map(|c| c.into_category(event.id, now))
            .collect::<Result<Vec<_>, _>>()?;

        self.events.create(&event, &categories).await?;
        tracing::info!(event_id = %event.id, owner = %event.owner_id, "event created");
        Ok(EventDetail { event, categories })
    }
}

// ── UpdateEvent ──────────────────────────────────────────────────────────────

pub struct UpdateEventUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> UpdateEventUseCase<E> {
    /// Replaces the descriptive fields; owner and status are untouched.
    pub async fn execute(
        &self,
        identity: AuthIdentity,
        event_id: Uuid,
        input: EventInput,
    ) -> Result<Event, TicketingServiceError> {
        input.validate()?;
        let mut event = owned_event(&self.events, identity, event_id).await?;
        event.name = input.name.trim().to_owned();
        event.date_start = input.date_start;
        event.date_end = input.date_end;
        event.location = input.location.trim().to_owned();
        event.description = input.description;
        event.image = input.image;
        event.flyer = input.flyer;
        event.category = input.category;
        event.updated_at = Utc::now();
        self.events.update(&event).await?;
        Ok(event)
    }
}

// ── DeleteEvent ──────────────────────────────────────────────────────────────

pub struct DeleteEventUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> DeleteEventUseCase<E> {
    pub async fn execute(
        &self,
        identity: AuthIdentity,
        event_id: Uuid,
    ) -> Result<(), TicketingServiceError> {
        owned_event(&self.events, identity, event_id).await?;
        if !self.events.delete_unsold(event_id).await? {
            return Err(TicketingServiceError::EventNotFound);
        }
        tracing::info!(%event_id, "event deleted");
        Ok(())
    }
}

// ── VerifyEvent ──────────────────────────────────────────────────────────────

pub struct VerifyEventUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> VerifyEventUseCase<E> {
    /// `pending → approved`; already approved events are returned unchanged.
    pub async fn execute(
        &self,
        identity: AuthIdentity,
        event_id: Uuid,
    ) -> Result<Event, TicketingServiceError> {
        if !identity.is_admin() {
            return Err(TicketingServiceError::Forbidden);
        }
        let mut event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(TicketingServiceError::EventNotFound)?;
        if event.status == EventStatus::Approved {
            return Ok(event);
        }
        if !self
            .events
            .set_status(event_id, EventStatus::Approved)
            .await?
        {
            return Err(TicketingServiceError::EventNotFound);
        }
        event.status = EventStatus::Approved;
        tracing::info!(%event_id, by = %identity.user_id, "event verified");
        Ok(event)
    }
}

// ── AddTicketCategory ────────────────────────────────────────────────────────

pub struct AddTicketCategoryUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> AddTicketCategoryUseCase<E> {
    pub async fn execute(
        &self,
        identity: AuthIdentity,
        event_id: Uuid,
        input: TicketCategoryInput,
    ) -> Result<TicketCategory, TicketingServiceError> {
        let event = owned_event(&self.events, identity, event_id).await?;
        let category = input.into_category(event.id, Utc::now())?;
        self.events.add_category(&category).await?;
        Ok(category)
    }
}

// ── ListEvents ───────────────────────────────────────────────────────────────

pub struct ListEventsUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> ListEventsUseCase<E> {
    pub async fn execute(&self) -> Result<Vec<Event>, TicketingServiceError> {
        self.events.list_approved().await
    }
}

// ── GetEvent ─────────────────────────────────────────────────────────────────

pub struct GetEventUseCase<E: EventRepository> {
    pub events: E,
}

impl<E: EventRepository> GetEventUseCase<E> {
    pub async fn execute(&self, event_id: Uuid) -> Result<EventDetail, TicketingServiceError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(TicketingServiceError::EventNotFound)?;
        let categories = self.events.list_categories(event_id).await?;
        Ok(EventDetail { event, categories })
    }
}
