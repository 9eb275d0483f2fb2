use super::util::insert_outcome;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::{MySqlPool, Row};

pub struct MySqlFollowRepo {
    pool: MySqlPool,
}

impl MySqlFollowRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlFollowRepo { pool }
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
            .map_err(|e| StoreError::backend("list follows", e))?;

        rows.iter()
            .map(|r| r.try_get::<UserId, _>(column))
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::backend("decode follow", e))
    }
}

#[async_trait::async_trait]
impl FollowRepo for MySqlFollowRepo {
    async fn insert(&self, edge: &FollowEdge) -> Result<InsertOutcome, StoreError> {
        let result =
            sqlx::query("INSERT INTO user_follow (follower, followee, created) VALUES (?, ?, ?)")
                .bind(edge.follower)
                .bind(edge.followee)
                .bind(edge.created)
                .execute(&self.pool)
                .await;

        insert_outcome(result, "insert follow")
    }

    async fn get(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<Option<FollowEdge>, StoreError> {
        let row = sqlx::query(
            "SELECT created FROM user_follow WHERE follower = ? AND followee = ?",
        )
        .bind(follower)
        .bind(followee)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::backend("get follow", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(FollowEdge {
            follower,
            followee,
            created: row
                .try_get("created")
                .map_err(|e| StoreError::backend("decode follow", e))?,
        }))
    }

    async fn exists(&self, follower: UserId, followee: UserId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM user_follow WHERE follower = ? AND followee = ?")
            .bind(follower)
            .bind(followee)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend("follow exists", e))?;
        Ok(row.is_some())
    }

    async fn delete(&self, follower: UserId, followee: UserId) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM user_follow WHERE follower = ? AND followee = ?")
            .bind(follower)
            .bind(followee)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend("delete follow", e))?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_followers(&self, followee: UserId) -> Result<Vec<UserId>, StoreError> {
        self.list_column(
            "SELECT follower FROM user_follow WHERE followee = ? ORDER BY created ASC",
            followee,
            "follower",
        )
        .await
    }

    async fn list_following(&self, follower: UserId) -> Result<Vec<UserId>, StoreError> {
        self.list_column(
            "SELECT followee FROM user_follow WHERE follower = ? ORDER BY created ASC",
            follower,
            "followee",
        )
        .await
    }
}
