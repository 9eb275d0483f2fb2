use super::util::{downcast, insert_outcome};
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlConnectionRequestRepo {
    pool: MySqlPool,
}

impl MySqlConnectionRequestRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlConnectionRequestRepo { pool }
    }

    fn row_to_request(r: &MySqlRow) -> Result<ConnectionRequest, StoreError> {
        let decode = |e: sqlx::Error| StoreError::backend("decode connection request", e);
        Ok(ConnectionRequest {
            from_user: r.try_get("from_user").map_err(decode)?,
            to_user: r.try_get("to_user").map_err(decode)?,
            message: r.try_get("message").map_err(decode)?,
            created: r.try_get("created").map_err(decode)?,
            rejected: r.try_get("rejected").map_err(decode)?,
            viewed: r.try_get("viewed").map_err(decode)?,
        })
    }
}

fn filter_clause(filter: RequestFilter) -> &'static str {
    match filter {
        RequestFilter::All => "",
        RequestFilter::Unread => " AND viewed IS NULL",
        RequestFilter::Read => " AND viewed IS NOT NULL",
        RequestFilter::Rejected => " AND rejected IS NOT NULL",
        RequestFilter::Unrejected => " AND rejected IS NULL",
    }
}

const REQUEST_COLUMNS: &str = "from_user, to_user, message, created, rejected, viewed";

#[async_trait::async_trait]
impl ConnectionRequestRepo for MySqlConnectionRequestRepo {
    async fn insert(&self, request: &ConnectionRequest) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            r#"
INSERT INTO connection_request (from_user, to_user, message, created, rejected, viewed)
VALUES (?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(request.from_user)
        .bind(request.to_user)
        .bind(&request.message)
        .bind(request.created)
        .bind(request.rejected)
        .bind(request.viewed)
        .execute(&self.pool)
        .await;

        insert_outcome(result, "insert connection request")
    }

    async fn get(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<Option<ConnectionRequest>, StoreError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM connection_request WHERE from_user = ? AND to_user = ?"
        );
        let row = sqlx::query(&sql)
            .bind(from_user)
            .bind(to_user)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend("get connection request", e))?;

        row.as_ref().map(Self::row_to_request).transpose()
    }

    async fn exists(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError> {
        let row =
            sqlx::query("SELECT 1 FROM connection_request WHERE from_user = ? AND to_user = ?")
                .bind(from_user)
                .bind(to_user)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::backend("connection request exists", e))?;
        Ok(row.is_some())
    }

    async fn list_received(
        &self,
        user: UserId,
        filter: RequestFilter,
    ) -> Result<Vec<ConnectionRequest>, StoreError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM connection_request WHERE to_user = ?{} \
             ORDER BY created ASC, from_user ASC",
            filter_clause(filter)
        );
        let rows = sqlx::query(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend("list received requests", e))?;

        rows.iter().map(Self::row_to_request).collect()
    }

    async fn count_received(&self, user: UserId, filter: RequestFilter) -> Result<u64, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM connection_request WHERE to_user = ?{}",
            filter_clause(filter)
        );
        let row = sqlx::query(&sql)
            .bind(user)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::backend("count received requests", e))?;

        let n = row
            .try_get::<i64, _>("n")
            .map_err(|e| StoreError::backend("decode request count", e))?;
        Ok(n.max(0) as u64)
    }

    async fn list_sent(&self, user: UserId) -> Result<Vec<ConnectionRequest>, StoreError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM connection_request WHERE from_user = ? \
             ORDER BY created ASC, to_user ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend("list sent requests", e))?;

        rows.iter().map(Self::row_to_request).collect()
    }

    async fn mark_viewed(
        &self,
        from_user: UserId,
        to_user: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let res = sqlx::query(
            "UPDATE connection_request SET viewed = ? WHERE from_user = ? AND to_user = ?",
        )
        .bind(at)
        .bind(from_user)
        .bind(to_user)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend("mark request viewed", e))?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM connection_request WHERE from_user = ? AND to_user = ?")
            .bind(from_user)
            .bind(to_user)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend("delete connection request", e))?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<bool, StoreError> {
        let tx = downcast(tx);

        let res = sqlx::query("DELETE FROM connection_request WHERE from_user = ? AND to_user = ?")
            .bind(from_user)
            .bind(to_user)
            .execute(tx.conn())
            .await
            .map_err(|e| StoreError::backend("delete connection request", e))?;
        Ok(res.rows_affected() > 0)
    }
}
