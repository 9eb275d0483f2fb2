use super::memory_store::{MemoryStore, downcast};
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};

fn same_pair(r: &ConnectionRequest, from_user: UserId, to_user: UserId) -> bool {
    r.from_user == from_user && r.to_user == to_user
}

#[async_trait::async_trait]
impl ConnectionRequestRepo for MemoryStore {
    async fn insert(&self, request: &ConnectionRequest) -> Result<InsertOutcome, StoreError> {
        let mut tables = self.lock().await;
        if tables
            .requests
            .iter()
            .any(|r| same_pair(r, request.from_user, request.to_user))
        {
            return Ok(InsertOutcome::Duplicate);
        }
        tables.requests.push(request.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<Option<ConnectionRequest>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .requests
            .iter()
            .find(|r| same_pair(r, from_user, to_user))
            .cloned())
    }

    async fn exists(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .requests
            .iter()
            .any(|r| same_pair(r, from_user, to_user)))
    }

    async fn list_received(
        &self,
        user: UserId,
        filter: RequestFilter,
    ) -> Result<Vec<ConnectionRequest>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .requests
            .iter()
            .filter(|r| r.to_user == user && filter.matches(r))
            .cloned()
            .collect())
    }

    async fn count_received(&self, user: UserId, filter: RequestFilter) -> Result<u64, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .requests
            .iter()
            .filter(|r| r.to_user == user && filter.matches(r))
            .count() as u64)
    }

    async fn list_sent(&self, user: UserId) -> Result<Vec<ConnectionRequest>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .requests
            .iter()
            .filter(|r| r.from_user == user)
            .cloned()
            .collect())
    }

    async fn mark_viewed(
        &self,
        from_user: UserId,
        to_user: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.lock().await;
        match tables
            .requests
            .iter_mut()
            .find(|r| same_pair(r, from_user, to_user))
        {
            Some(request) => {
                request.viewed = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError> {
        let mut tables = self.lock().await;
        let before = tables.requests.len();
        tables.requests.retain(|r| !same_pair(r, from_user, to_user));
        Ok(tables.requests.len() < before)
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<bool, StoreError> {
        let tables = downcast(tx).tables();
        let before = tables.requests.len();
        tables.requests.retain(|r| !same_pair(r, from_user, to_user));
        Ok(tables.requests.len() < before)
    }
}
