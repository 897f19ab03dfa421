use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Ticketing service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum TicketingServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("event not found")]
    EventNotFound,
    #[error("ticket category not found")]
    CategoryNotFound,
    #[error("cart line not found")]
    CartLineNotFound,
    #[error("ticket not found")]
    TicketNotFound,
    #[error("insufficient inventory for {0}")]
    InsufficientInventory(String),
    #[error("cart is empty")]
    EmptyCart,
    #[error("ticket already used")]
    AlreadyUsed,
    #[error("invalid quantity")]
    InvalidQuantity,
    #[error("invalid schedule")]
    InvalidSchedule,
    #[error("invalid price")]
    InvalidPrice,
    #[error("invalid registration")]
    InvalidRegistration,
    #[error("missing data")]
    MissingData,
    #[error("user is not an organizer")]
    NotOrganizer,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("event has sales")]
    EventHasSales,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account pending approval")]
    AccountPending,
    #[error("forbidden")]
    Forbidden,
    #[error("conflicting concurrent update, retry later")]
    Conflict,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl TicketingServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::CartLineNotFound => "CART_LINE_NOT_FOUND",
            Self::TicketNotFound => "TICKET_NOT_FOUND",
            Self::InsufficientInventory(_) => "INSUFFICIENT_INVENTORY",
            Self::EmptyCart => "EMPTY_CART",
            Self::AlreadyUsed => "ALREADY_USED",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InvalidSchedule => "INVALID_SCHEDULE",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidRegistration => "INVALID_REGISTRATION",
            Self::MissingData => "MISSING_DATA",
            Self::NotOrganizer => "NOT_ORGANIZER",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::EventHasSales => "EVENT_HAS_SALES",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountPending => "ACCOUNT_PENDING",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Transient store contention; the whole unit of work may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

impl IntoResponse for TicketingServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::EventNotFound
            | Self::CategoryNotFound
            | Self::CartLineNotFound
            | Self::TicketNotFound => StatusCode::NOT_FOUND,
            Self::InsufficientInventory(_)
            | Self::AlreadyUsed
            | Self::UserAlreadyExists
            | Self::EventHasSales => StatusCode::CONFLICT,
            Self::EmptyCart
            | Self::InvalidQuantity
            | Self::InvalidSchedule
            | Self::InvalidPrice
            | Self::InvalidRegistration
            | Self::MissingData
            | Self::NotOrganizer => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AccountPending | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
