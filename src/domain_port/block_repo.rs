use crate::domain_model::*;
use crate::domain_port::{InsertOutcome, StoreError};

#[async_trait::async_trait]
pub trait BlockRepo: Send + Sync {
    async fn insert(&self, edge: &BlockEdge) -> Result<InsertOutcome, StoreError>;

    async fn get(&self, blocker: UserId, blocked: UserId) -> Result<Option<BlockEdge>, StoreError>;

    async fn exists(&self, blocker: UserId, blocked: UserId) -> Result<bool, StoreError>;

    async fn delete(&self, blocker: UserId, blocked: UserId) -> Result<bool, StoreError>;

    /// Users who block `blocked`.
    async fn list_blockers(&self, blocked: UserId) -> Result<Vec<UserId>, StoreError>;

    /// Users `blocker` blocks.
    async fn list_blocking(&self, blocker: UserId) -> Result<Vec<UserId>, StoreError>;
}
