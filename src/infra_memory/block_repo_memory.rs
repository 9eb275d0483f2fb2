use super::memory_store::MemoryStore;
use crate::domain_model::*;
use crate::domain_port::*;

#[async_trait::async_trait]
impl BlockRepo for MemoryStore {
    async fn insert(&self, edge: &BlockEdge) -> Result<InsertOutcome, StoreError> {
        let mut tables = self.lock().await;
        if tables
            .blocks
            .iter()
            .any(|b| b.blocker == edge.blocker && b.blocked == edge.blocked)
        {
            return Ok(InsertOutcome::Duplicate);
        }
        tables.blocks.push(edge.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get(&self, blocker: UserId, blocked: UserId) -> Result<Option<BlockEdge>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .blocks
            .iter()
            .find(|b| b.blocker == blocker && b.blocked == blocked)
            .cloned())
    }

    async fn exists(&self, blocker: UserId, blocked: UserId) -> Result<bool, StoreError> {
        Ok(BlockRepo::get(self, blocker, blocked).await?.is_some())
    }

    async fn delete(&self, blocker: UserId, blocked: UserId) -> Result<bool, StoreError> {
        let mut tables = self.lock().await;
        let before = tables.blocks.len();
        tables
            .blocks
            .retain(|b| !(b.blocker == blocker && b.blocked == blocked));
        Ok(tables.blocks.len() < before)
    }

    async fn list_blockers(&self, blocked: UserId) -> Result<Vec<UserId>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .blocks
            .iter()
            .filter(|b| b.blocked == blocked)
            .map(|b| b.blocker)
            .collect())
    }

    async fn list_blocking(&self, blocker: UserId) -> Result<Vec<UserId>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .blocks
            .iter()
            .filter(|b| b.blocker == blocker)
            .map(|b| b.blocked)
            .collect())
    }
}
