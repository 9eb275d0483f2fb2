use super::memory_store::MemoryStore;
use crate::domain_model::*;
use crate::domain_port::*;

#[async_trait::async_trait]
impl FollowRepo for MemoryStore {
    async fn insert(&self, edge: &FollowEdge) -> Result<InsertOutcome, StoreError> {
        let mut tables = self.lock().await;
        if tables
            .follows
            .iter()
            .any(|f| f.follower == edge.follower && f.followee == edge.followee)
        {
            return Ok(InsertOutcome::Duplicate);
        }
        tables.follows.push(edge.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<Option<FollowEdge>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .follows
            .iter()
            .find(|f| f.follower == follower && f.followee == followee)
            .cloned())
    }

    async fn exists(&self, follower: UserId, followee: UserId) -> Result<bool, StoreError> {
        Ok(FollowRepo::get(self, follower, followee).await?.is_some())
    }

    async fn delete(&self, follower: UserId, followee: UserId) -> Result<bool, StoreError> {
        let mut tables = self.lock().await;
        let before = tables.follows.len();
        tables
            .follows
            .retain(|f| !(f.follower == follower && f.followee == followee));
        Ok(tables.follows.len() < before)
    }

    async fn list_followers(&self, followee: UserId) -> Result<Vec<UserId>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .follows
            .iter()
            .filter(|f| f.followee == followee)
            .map(|f| f.follower)
            .collect())
    }

    async fn list_following(&self, follower: UserId) -> Result<Vec<UserId>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .follows
            .iter()
            .filter(|f| f.follower == follower)
            .map(|f| f.followee)
            .collect())
    }
}
