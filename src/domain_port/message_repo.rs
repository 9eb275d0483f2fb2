use crate::domain_model::*;
use crate::domain_port::{StorageTx, StoreError};
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait MessageRepo: Send + Sync {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        message: &InvoiceMessage,
    ) -> Result<(), StoreError>;

    /// Returns `false` when the message does not exist.
    async fn mark_replied_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        message_id: MessageId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn get(&self, message_id: MessageId) -> Result<Option<InvoiceMessage>, StoreError>;

    /// Newest first.
    async fn list_received(&self, user: UserId) -> Result<Vec<InvoiceMessage>, StoreError>;

    /// Newest first.
    async fn list_sent(&self, user: UserId) -> Result<Vec<InvoiceMessage>, StoreError>;
}
