use crate::domain_model::*;
use serde::{Deserialize, Serialize};

/// Values the relationship services keep in the shared cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum CachedValue {
    Users(Vec<UserId>),
    Requests(Vec<ConnectionRequest>),
    Count(u64),
}

/// Conversion between a typed read result and its cached form.
pub trait CacheEntry: Sized {
    fn from_cached(value: CachedValue) -> Option<Self>;
    fn into_cached(self) -> CachedValue;
}

impl CacheEntry for Vec<UserId> {
    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Users(users) => Some(users),
            _ => None,
        }
    }

    fn into_cached(self) -> CachedValue {
        CachedValue::Users(self)
    }
}

impl CacheEntry for Vec<ConnectionRequest> {
    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Requests(requests) => Some(requests),
            _ => None,
        }
    }

    fn into_cached(self) -> CachedValue {
        CachedValue::Requests(self)
    }
}

impl CacheEntry for u64 {
    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Count(count) => Some(count),
            _ => None,
        }
    }

    fn into_cached(self) -> CachedValue {
        CachedValue::Count(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("malformed cache entry: {0}")]
    Decode(String),
}

/// Key-value cache shared by every process serving the same users. Entries
/// carry no TTL; they live until a write drops them.
#[async_trait::async_trait]
pub trait RelationCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>, CacheError>;
    async fn set(&self, key: &CacheKey, value: &CachedValue) -> Result<(), CacheError>;
    async fn delete_many(&self, keys: &[CacheKey]) -> Result<(), CacheError>;
}
