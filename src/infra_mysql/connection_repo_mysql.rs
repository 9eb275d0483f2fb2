use super::util::{downcast, insert_outcome};
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::{MySqlPool, Row};

pub struct MySqlConnectionRepo {
    pool: MySqlPool,
}

impl MySqlConnectionRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlConnectionRepo { pool }
    }
}

fn flag_column(role: PartnerRole) -> &'static str {
    match role {
        PartnerRole::Supplier => "is_supplier",
        PartnerRole::Costumer => "is_costumer",
    }
}

#[async_trait::async_trait]
impl ConnectionRepo for MySqlConnectionRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        edge: &ConnectionEdge,
    ) -> Result<InsertOutcome, StoreError> {
        let tx = downcast(tx);

        let result = sqlx::query(
            r#"
INSERT INTO user_connection (from_user, to_user, is_supplier, is_costumer, created)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(edge.from_user)
        .bind(edge.to_user)
        .bind(edge.is_supplier)
        .bind(edge.is_costumer)
        .bind(edge.created)
        .execute(tx.conn())
        .await;

        insert_outcome(result, "insert connection")
    }

    async fn list_connections(&self, user: UserId) -> Result<Vec<UserId>, StoreError> {
        let rows = sqlx::query(
            r#"
SELECT from_user FROM user_connection
WHERE to_user = ?
ORDER BY created ASC, from_user ASC
"#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::backend("list connections", e))?;

        rows.iter()
            .map(|r| r.try_get::<UserId, _>("from_user"))
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::backend("decode connection", e))
    }

    async fn list_partners(
        &self,
        user: UserId,
        role: PartnerRole,
    ) -> Result<Vec<UserId>, StoreError> {
        let sql = format!(
            "SELECT to_user FROM user_connection WHERE from_user = ? AND {} = 1 \
             ORDER BY created ASC, to_user ASC",
            flag_column(role)
        );
        let rows = sqlx::query(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend("list partners", e))?;

        rows.iter()
            .map(|r| r.try_get::<UserId, _>("to_user"))
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::backend("decode partner", e))
    }

    async fn exists(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM user_connection WHERE from_user = ? AND to_user = ?")
            .bind(from_user)
            .bind(to_user)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend("connection exists", e))?;
        Ok(row.is_some())
    }

    async fn set_partner_flag(
        &self,
        from_user: UserId,
        to_user: UserId,
        role: PartnerRole,
        value: bool,
    ) -> Result<bool, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend("begin set partner flag", e))?;

        // row lock keeps a concurrent remove_connection out until the update lands
        let locked = sqlx::query(
            "SELECT 1 FROM user_connection WHERE from_user = ? AND to_user = ? FOR UPDATE",
        )
        .bind(from_user)
        .bind(to_user)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::backend("lock connection", e))?;
        if locked.is_none() {
            return Ok(false);
        }

        let sql = format!(
            "UPDATE user_connection SET {} = ? WHERE from_user = ? AND to_user = ?",
            flag_column(role)
        );
        sqlx::query(&sql)
            .bind(value)
            .bind(from_user)
            .bind(to_user)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend("set partner flag", e))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::backend("commit set partner flag", e))?;
        Ok(true)
    }

    async fn delete_between(&self, a: UserId, b: UserId) -> Result<u64, StoreError> {
        let res = sqlx::query(
            r#"
DELETE FROM user_connection
WHERE (from_user = ? AND to_user = ?) OR (from_user = ? AND to_user = ?)
"#,
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend("delete connection", e))?;
        Ok(res.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_mysql::MySqlTxManager;
    use chrono::Utc;

    async fn seed_edge(pool: &MySqlPool, from_user: UserId, to_user: UserId) {
        let tx_manager = MySqlTxManager::new(pool.clone());
        let repo = MySqlConnectionRepo::new(pool.clone());
        let mut tx = tx_manager.begin().await.unwrap();
        let edge = ConnectionEdge::new(from_user, to_user, Utc::now());
        repo.insert_in_tx(&mut *tx, &edge).await.unwrap();
        tx.commit().await.unwrap();
    }

    async fn supplier_flag(pool: &MySqlPool, from_user: UserId, to_user: UserId) -> bool {
        sqlx::query("SELECT is_supplier FROM user_connection WHERE from_user = ? AND to_user = ?")
            .bind(from_user)
            .bind(to_user)
            .fetch_one(pool)
            .await
            .unwrap()
            .get("is_supplier")
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a MySQL server"]
    async fn partner_flag_follows_edge_existence(pool: MySqlPool) {
        let repo = MySqlConnectionRepo::new(pool.clone());
        let (a, b) = (UserId::new_random(), UserId::new_random());

        assert!(!repo.set_partner_flag(a, b, PartnerRole::Supplier, true).await.unwrap());

        seed_edge(&pool, a, b).await;
        assert!(repo.set_partner_flag(a, b, PartnerRole::Supplier, true).await.unwrap());
        // same value again still matches the row
        assert!(repo.set_partner_flag(a, b, PartnerRole::Supplier, true).await.unwrap());
        assert!(supplier_flag(&pool, a, b).await);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a MySQL server"]
    async fn partner_flag_on_edge_removed_concurrently_is_false(pool: MySqlPool) {
        let repo = MySqlConnectionRepo::new(pool.clone());
        let (a, b) = (UserId::new_random(), UserId::new_random());
        seed_edge(&pool, a, b).await;

        let mut remover = pool.begin().await.unwrap();
        sqlx::query("DELETE FROM user_connection WHERE from_user = ? AND to_user = ?")
            .bind(a)
            .bind(b)
            .execute(&mut *remover)
            .await
            .unwrap();

        let flagging = tokio::spawn(async move {
            repo.set_partner_flag(a, b, PartnerRole::Supplier, true).await
        });
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        remover.commit().await.unwrap();

        assert!(!flagging.await.unwrap().unwrap());
    }
}
