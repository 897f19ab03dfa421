use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loket_auth_types::identity::AuthIdentity;

use crate::domain::types::{CartLine, Receipt};
use crate::error::TicketingServiceError;
use crate::handlers::ticket::TicketResponse;
use crate::handlers::transaction::TransactionResponse;
use crate::state::AppState;
use crate::usecase::cart::{
    AddToCartUseCase, ListCartUseCase, RemoveFromCartUseCase, UpdateCartLineUseCase,
};
use crate::usecase::checkout::CheckoutUseCase;

#[derive(Serialize)]
pub struct CartLineResponse {
    pub ticket_category_id: Uuid,
    pub quantity: i32,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            ticket_category_id: line.ticket_category_id,
            quantity: line.quantity,
            created_at: line.created_at,
            updated_at: line.updated_at,
        }
    }
}

/// Body of `POST /api/cart` and `PATCH /api/cart`.
#[derive(Deserialize)]
pub struct CartLineRequest {
    pub ticket_category_id: Uuid,
    pub quantity: i32,
}

// ── GET /api/cart ────────────────────────────────────────────────────────────

pub async fn list_cart(
    identity: AuthIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<CartLineResponse>>, TicketingServiceError> {
    let usecase = ListCartUseCase {
        cart: state.cart_repo(),
    };
    let lines = usecase.execute(identity.user_id).await?;
    Ok(Json(lines.into_iter().map(CartLineResponse::from).collect()))
}

// ── POST /api/cart ───────────────────────────────────────────────────────────

pub async fn add_to_cart(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Json(body): Json<CartLineRequest>,
) -> Result<StatusCode, TicketingServiceError> {
    let usecase = AddToCartUseCase {
        cart: state.cart_repo(),
        events: state.event_repo(),
    };
    usecase
        .execute(identity.user_id, body.ticket_category_id, body.quantity)
        .await?;
    Ok(StatusCode::CREATED)
}

// ── PATCH /api/cart ──────────────────────────────────────────────────────────

pub async fn update_cart_line(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Json(body): Json<CartLineRequest>,
) -> Result<StatusCode, TicketingServiceError> {
    let usecase = UpdateCartLineUseCase {
        cart: state.cart_repo(),
    };
    usecase
        .execute(identity.user_id, body.ticket_category_id, body.quantity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /api/cart ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RemoveFromCartQuery {
    pub ticket_category_id: Uuid,
}

pub async fn remove_from_cart(
    identity: AuthIdentity,
    State(state): State<AppState>,
    Query(query): Query<RemoveFromCartQuery>,
) -> Result<StatusCode, TicketingServiceError> {
    let usecase = RemoveFromCartUseCase {
        cart: state.cart_repo(),
    };
    usecase
        .execute(identity.user_id, query.ticket_category_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/cart/checkout ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub ticket_count: usize,
    pub total_amount: i64,
    pub tickets: Vec<TicketResponse>,
    pub transactions: Vec<TransactionResponse>,
}

impl From<Receipt> for CheckoutResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            ticket_count: receipt.tickets.len(),
            total_amount: receipt.total_amount,
            tickets: receipt.tickets.into_iter().map(Into::into).collect(),
            transactions: receipt.transactions.into_iter().map(Into::into).collect(),
        }
    }
}

pub async fn checkout(
    identity: AuthIdentity,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CheckoutResponse>), TicketingServiceError> {
    let usecase = CheckoutUseCase {
        store: state.inventory_store(),
        retry: state.checkout_retry,
    };
    let receipt = usecase.execute(identity.user_id).await?;
    Ok((StatusCode::CREATED, Json(receipt.into())))
}
