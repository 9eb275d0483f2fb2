use crate::domain_model::CacheKey;
use crate::domain_port::*;
use dashmap::DashMap;

/// Single-process cache. Only correct when one server instance owns the users.
#[derive(Default)]
pub struct MemoryRelationCache {
    entries: DashMap<String, CachedValue>,
}

impl MemoryRelationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holds(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(&key.to_string())
    }
}

#[async_trait::async_trait]
impl RelationCache for MemoryRelationCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>, CacheError> {
        Ok(self
            .entries
            .get(&key.to_string())
            .map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &CacheKey, value: &CachedValue) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete_many(&self, keys: &[CacheKey]) -> Result<(), CacheError> {
        for key in keys {
            self.entries.remove(&key.to_string());
        }
        Ok(())
    }
}
