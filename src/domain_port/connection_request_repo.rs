use crate::domain_model::*;
use crate::domain_port::{InsertOutcome, StorageTx, StoreError};
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait ConnectionRequestRepo: Send + Sync {
    async fn insert(&self, request: &ConnectionRequest) -> Result<InsertOutcome, StoreError>;

    async fn get(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<Option<ConnectionRequest>, StoreError>;

    async fn exists(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError>;

    /// Requests addressed to `user`, oldest first.
    async fn list_received(
        &self,
        user: UserId,
        filter: RequestFilter,
    ) -> Result<Vec<ConnectionRequest>, StoreError>;

    async fn count_received(&self, user: UserId, filter: RequestFilter) -> Result<u64, StoreError>;

    /// Requests sent by `user`, oldest first.
    async fn list_sent(&self, user: UserId) -> Result<Vec<ConnectionRequest>, StoreError>;

    async fn mark_viewed(
        &self,
        from_user: UserId,
        to_user: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn delete(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError>;

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<bool, StoreError>;
}
