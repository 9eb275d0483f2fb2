use super::util::insert_outcome;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::{MySqlPool, Row};

pub struct MySqlBlockRepo {
    pool: MySqlPool,
}

impl MySqlBlockRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlBlockRepo { pool }
    }

    async fn list_column(
        &self,
        sql: &str,
        user: UserId,
        column: &str,
    ) -> Result<Vec<UserId>, StoreError> {
        let rows = sqlx::query(sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend("list blocks", e))?;

        rows.iter()
            .map(|r| r.try_get::<UserId, _>(column))
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::backend("decode block", e))
    }
}

#[async_trait::async_trait]
impl BlockRepo for MySqlBlockRepo {
    async fn insert(&self, edge: &BlockEdge) -> Result<InsertOutcome, StoreError> {
        let result =
            sqlx::query("INSERT INTO user_block (blocker, blocked, created) VALUES (?, ?, ?)")
                .bind(edge.blocker)
                .bind(edge.blocked)
                .bind(edge.created)
                .execute(&self.pool)
                .await;

        insert_outcome(result, "insert block")
    }

    async fn get(&self, blocker: UserId, blocked: UserId) -> Result<Option<BlockEdge>, StoreError> {
        let row = sqlx::query("SELECT created FROM user_block WHERE blocker = ? AND blocked = ?")
            .bind(blocker)
            .bind(blocked)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend("get block", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(BlockEdge {
            blocker,
            blocked,
            created: row
                .try_get("created")
                .map_err(|e| StoreError::backend("decode block", e))?,
        }))
    }

    async fn exists(&self, blocker: UserId, blocked: UserId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM user_block WHERE blocker = ? AND blocked = ?")
            .bind(blocker)
            .bind(blocked)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend("block exists", e))?;
        Ok(row.is_some())
    }

    async fn delete(&self, blocker: UserId, blocked: UserId) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM user_block WHERE blocker = ? AND blocked = ?")
            .bind(blocker)
            .bind(blocked)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend("delete block", e))?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_blockers(&self, blocked: UserId) -> Result<Vec<UserId>, StoreError> {
        self.list_column(
            "SELECT blocker FROM user_block WHERE blocked = ? ORDER BY created ASC",
            blocked,
            "blocker",
        )
        .await
    }

    async fn list_blocking(&self, blocker: UserId) -> Result<Vec<UserId>, StoreError> {
        self.list_column(
            "SELECT blocked FROM user_block WHERE blocker = ? ORDER BY created ASC",
            blocker,
            "blocked",
        )
        .await
    }
}
