use super::memory_store::{MemoryStore, downcast};
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
impl MessageRepo for MemoryStore {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        message: &InvoiceMessage,
    ) -> Result<(), StoreError> {
        downcast(tx).tables().messages.push(message.clone());
        Ok(())
    }

    async fn mark_replied_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        message_id: MessageId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let tables = downcast(tx).tables();
        match tables
            .messages
            .iter_mut()
            .find(|m| m.message_id == message_id)
        {
            Some(message) => {
                message.replied_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, message_id: MessageId) -> Result<Option<InvoiceMessage>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .messages
            .iter()
            .find(|m| m.message_id == message_id)
            .cloned())
    }

    async fn list_received(&self, user: UserId) -> Result<Vec<InvoiceMessage>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .messages
            .iter()
            .rev()
            .filter(|m| m.recipient == user)
            .cloned()
            .collect())
    }

    async fn list_sent(&self, user: UserId) -> Result<Vec<InvoiceMessage>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .messages
            .iter()
            .rev()
            .filter(|m| m.sender == user)
            .cloned()
            .collect())
    }
}
