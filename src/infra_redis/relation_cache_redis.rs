use crate::domain_model::CacheKey;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Relationship cache shared by every server instance. Values are stored as
/// JSON strings without expiry.
pub struct RedisRelationCache {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisRelationCache {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisRelationCache {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &CacheKey) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

#[async_trait::async_trait]
impl RelationCache for RedisRelationCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(self.key(key))
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        raw.map(|s| serde_json::from_str(&s).map_err(|e| CacheError::Decode(e.to_string())))
            .transpose()
    }

    async fn set(&self, key: &CacheKey, value: &CachedValue) -> Result<(), CacheError> {
        let payload =
            serde_json::to_string(value).map_err(|e| CacheError::Decode(e.to_string()))?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(self.key(key), payload)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn delete_many(&self, keys: &[CacheKey]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(keys)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }
}
