use crate::application_port::RelationError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait BlockService: Send + Sync {
    /// Users who block `user`.
    async fn blocked(&self, user: UserId) -> Result<Vec<UserId>, RelationError>;
    /// Users `user` blocks.
    async fn blocking(&self, user: UserId) -> Result<Vec<UserId>, RelationError>;
    /// Users on either side of a block with `user`.
    async fn blocks(&self, user: UserId) -> Result<Vec<UserId>, RelationError>;
    async fn add_block(&self, blocker: UserId, blocked: UserId)
    -> Result<BlockEdge, RelationError>;
    async fn remove_block(&self, blocker: UserId, blocked: UserId) -> Result<bool, RelationError>;
    async fn is_blocked(&self, blocker: UserId, blocked: UserId) -> Result<bool, RelationError>;
}
