use super::memory_store::MemoryStore;
use crate::domain_port::*;

#[async_trait::async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_web_id(&self, web_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.web_id.as_deref() == Some(web_id))
            .cloned())
    }

    async fn find_by_peppol_id(&self, peppol_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.peppol_id.as_deref() == Some(peppol_id))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}
