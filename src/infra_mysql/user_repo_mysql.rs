use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_user(r: &MySqlRow) -> Result<UserRecord, StoreError> {
        let decode = |e: sqlx::Error| StoreError::backend("decode user", e);
        Ok(UserRecord {
            user_id: r.try_get("user_id").map_err(decode)?,
            username: r.try_get("username").map_err(decode)?,
            web_id: r.try_get("web_id").map_err(decode)?,
            peppol_id: r.try_get("peppol_id").map_err(decode)?,
            is_active: r.try_get("is_active").map_err(decode)?,
            created_at: r.try_get("created_at").map_err(decode)?,
        })
    }

    async fn find_by(&self, column: &str, value: &str) -> Result<Option<UserRecord>, StoreError> {
        let sql = format!(
            "SELECT user_id, username, web_id, peppol_id, is_active, created_at \
             FROM user WHERE {column} = ? LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend("find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn find_by_web_id(&self, web_id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.find_by("web_id", web_id).await
    }

    async fn find_by_peppol_id(&self, peppol_id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.find_by("peppol_id", peppol_id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        self.find_by("username", username).await
    }
}
