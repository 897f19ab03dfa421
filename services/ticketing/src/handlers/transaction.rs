use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use loket_auth_types::identity::AuthIdentity;

use crate::domain::types::TransactionRecord;
use crate::error::TicketingServiceError;
use crate::state::AppState;
use crate::usecase::transaction::ListTransactionsUseCase;

#[derive(Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub total_amount: i64,
    pub status: String,
    #[serde(serialize_with = "loket_core::serde::to_rfc3339_ms")]
    pub transaction_time: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            event_id: record.event_id,
            total_amount: record.total_amount,
            status: record.status,
            transaction_time: record.transaction_time,
        }
    }
}

// ── GET /api/transactions ────────────────────────────────────────────────────

pub async fn list_transactions(
    identity: AuthIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionResponse>>, TicketingServiceError> {
    let usecase = ListTransactionsUseCase {
        transactions: state.transaction_repo(),
    };
    let records = usecase.execute(identity.user_id).await?;
    Ok(Json(
        records.into_iter().map(TransactionResponse::from).collect(),
    ))
}
