use crate::application_port::RelationError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait FollowService: Send + Sync {
    async fn followers(&self, user: UserId) -> Result<Vec<UserId>, RelationError>;
    async fn following(&self, user: UserId) -> Result<Vec<UserId>, RelationError>;
    async fn add_follower(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<FollowEdge, RelationError>;
    async fn remove_follower(&self, follower: UserId, followee: UserId)
    -> Result<bool, RelationError>;
    async fn follows(&self, follower: UserId, followee: UserId) -> Result<bool, RelationError>;
}
