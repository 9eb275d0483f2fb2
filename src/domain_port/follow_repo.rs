use crate::domain_model::*;
use crate::domain_port::{InsertOutcome, StoreError};

#[async_trait::async_trait]
pub trait FollowRepo: Send + Sync {
    async fn insert(&self, edge: &FollowEdge) -> Result<InsertOutcome, StoreError>;

    async fn get(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<Option<FollowEdge>, StoreError>;

    async fn exists(&self, follower: UserId, followee: UserId) -> Result<bool, StoreError>;

    async fn delete(&self, follower: UserId, followee: UserId) -> Result<bool, StoreError>;

    async fn list_followers(&self, followee: UserId) -> Result<Vec<UserId>, StoreError>;

    async fn list_following(&self, follower: UserId) -> Result<Vec<UserId>, StoreError>;
}
