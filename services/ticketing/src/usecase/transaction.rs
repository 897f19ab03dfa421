use uuid::Uuid;

use crate::domain::repository::TransactionRepository;
use crate::domain::types::TransactionRecord;
use crate::error::TicketingServiceError;

pub struct ListTransactionsUseCase<T: TransactionRepository> {
    pub transactions: T,
}

impl<T: TransactionRepository> ListTransactionsUseCase<T> {
    pub async fn execute(
        &self,
        owner: Uuid,
    ) -> Result<Vec<TransactionRecord>, TicketingServiceError> {
        self.transactions.list_by_owner(owner).await
    }
}
