use crate::application_port::RelationError;
use crate::domain_model::*;
use crate::domain_port::*;
use std::future::Future;
use std::sync::Arc;

/// Read-through and invalidation helpers shared by the relationship services.
///
/// Cache faults never fail a request: a failed read is a miss, a failed write
/// or delete is logged and the store result stands.
#[derive(Clone)]
pub struct CacheFacade {
    cache: Arc<dyn RelationCache>,
}

impl CacheFacade {
    pub fn new(cache: Arc<dyn RelationCache>) -> Self {
        Self { cache }
    }

    pub async fn lookup<T: CacheEntry>(&self, key: CacheKey) -> Option<T> {
        match self.cache.get(&key).await {
            Ok(Some(value)) => {
                let typed = T::from_cached(value);
                if typed.is_none() {
                    tracing::warn!(%key, "cache entry has unexpected shape, treating as miss");
                }
                typed
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%key, "cache read failed: {e}");
                None
            }
        }
    }

    pub async fn store<T: CacheEntry>(&self, key: CacheKey, value: T) {
        if let Err(e) = self.cache.set(&key, &value.into_cached()).await {
            tracing::warn!(%key, "cache write failed: {e}");
        }
    }

    /// Serve `key` from the cache, or run `load` and remember its result.
    pub async fn read_through<T, F, Fut>(&self, key: CacheKey, load: F) -> Result<T, RelationError>
    where
        T: CacheEntry + Clone + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, StoreError>> + Send,
    {
        if let Some(hit) = self.lookup::<T>(key).await {
            tracing::trace!(%key, "cache hit");
            return Ok(hit);
        }

        let value = load().await?;
        self.store(key, value.clone()).await;
        Ok(value)
    }

    /// `true` only when a user list is cached under `key` and holds `user`.
    /// Absent and stale lists both answer `false`; callers fall back to the
    /// store.
    pub async fn cached_list_contains(&self, key: CacheKey, user: UserId) -> bool {
        matches!(self.lookup::<Vec<UserId>>(key).await, Some(users) if users.contains(&user))
    }

    pub async fn bust(&self, targets: &[(CacheKind, UserId)]) {
        let keys: Vec<CacheKey> = targets
            .iter()
            .flat_map(|(kind, user)| kind.invalidation_keys(*user))
            .collect();

        if let Err(e) = self.cache.delete_many(&keys).await {
            tracing::error!(keys = keys.len(), "cache invalidation failed: {e}");
        }
    }
}
