use crate::domain_model::*;
use crate::domain_port::StoreError;
use chrono::{DateTime, Utc};

/// Read-only view of the account table, which is owned by the identity
/// service.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: String,
    pub web_id: Option<String>,
    pub peppol_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_web_id(&self, web_id: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_peppol_id(&self, peppol_id: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;
}
