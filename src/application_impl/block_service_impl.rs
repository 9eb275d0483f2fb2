use crate::application_impl::CacheFacade;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use std::sync::Arc;

pub struct RealBlockService {
    block_repo: Arc<dyn BlockRepo>,
    cache: CacheFacade,
    events: Arc<dyn EventSink>,
}

impl RealBlockService {
    pub fn new(
        block_repo: Arc<dyn BlockRepo>,
        cache: Arc<dyn RelationCache>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            block_repo,
            cache: CacheFacade::new(cache),
            events,
        }
    }

    async fn bust_pair(&self, edge: &BlockEdge) {
        self.cache
            .bust(&[
                (CacheKind::Blocked, edge.blocked),
                (CacheKind::Blocking, edge.blocker),
                (CacheKind::Blocks, edge.blocked),
                (CacheKind::Blocks, edge.blocker),
            ])
            .await;
    }
}

#[async_trait::async_trait]
impl BlockService for RealBlockService {
    async fn blocked(&self, user: UserId) -> Result<Vec<UserId>, RelationError> {
        self.cache
            .read_through(CacheKind::Blocked.key(user), || {
                self.block_repo.list_blockers(user)
            })
            .await
    }

    async fn blocking(&self, user: UserId) -> Result<Vec<UserId>, RelationError> {
        self.cache
            .read_through(CacheKind::Blocking.key(user), || {
                self.block_repo.list_blocking(user)
            })
            .await
    }

    async fn blocks(&self, user: UserId) -> Result<Vec<UserId>, RelationError> {
        let repo = self.block_repo.clone();
        self.cache
            .read_through(CacheKind::Blocks.key(user), || async move {
                let mut users = repo.list_blocking(user).await?;
                for blocker in repo.list_blockers(user).await? {
                    if !users.contains(&blocker) {
                        users.push(blocker);
                    }
                }
                Ok(users)
            })
            .await
    }

    async fn add_block(&self, blocker: UserId, blocked: UserId) -> Result<BlockEdge, RelationError> {
        if blocker == blocked {
            return Err(RelationError::Validation(
                "users cannot block themselves".to_string(),
            ));
        }

        let edge = BlockEdge {
            blocker,
            blocked,
            created: Utc::now(),
        };
        if let InsertOutcome::Duplicate = self.block_repo.insert(&edge).await? {
            return Err(RelationError::AlreadyExists(format!(
                "{blocker} already blocks {blocked}"
            )));
        }

        self.events
            .emit(EventEnvelope::new(
                vec![blocker, blocked],
                DomainEvent::BlockCreated(edge.clone()),
            ))
            .await;
        self.bust_pair(&edge).await;

        Ok(edge)
    }

    async fn remove_block(&self, blocker: UserId, blocked: UserId) -> Result<bool, RelationError> {
        let Some(edge) = self.block_repo.get(blocker, blocked).await? else {
            return Ok(false);
        };
        if !self.block_repo.delete(blocker, blocked).await? {
            return Ok(false);
        }

        self.events
            .emit(EventEnvelope::new(
                vec![blocker, blocked],
                DomainEvent::BlockRemoved(edge.clone()),
            ))
            .await;
        self.bust_pair(&edge).await;

        Ok(true)
    }

    async fn is_blocked(&self, blocker: UserId, blocked: UserId) -> Result<bool, RelationError> {
        if self
            .cache
            .cached_list_contains(CacheKind::Blocking.key(blocker), blocked)
            .await
            || self
                .cache
                .cached_list_contains(CacheKind::Blocked.key(blocked), blocker)
                .await
        {
            return Ok(true);
        }

        Ok(self.block_repo.exists(blocker, blocked).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::*;

    fn setup() -> RealBlockService {
        let store = Arc::new(MemoryStore::new());
        RealBlockService::new(
            store,
            Arc::new(MemoryRelationCache::new()),
            Arc::new(MemoryEventSink::new()),
        )
    }

    #[tokio::test]
    async fn blocked_lists_blockers_not_targets() {
        let service = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        service.add_block(a, b).await.unwrap();

        assert_eq!(service.blocked(b).await.unwrap(), vec![a]);
        assert!(service.blocked(a).await.unwrap().is_empty());
        assert_eq!(service.blocking(a).await.unwrap(), vec![b]);
        assert!(service.is_blocked(a, b).await.unwrap());
        assert!(!service.is_blocked(b, a).await.unwrap());
    }

    #[tokio::test]
    async fn blocks_is_union_of_both_directions() {
        let service = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());
        let c = UserId::new_random();

        service.add_block(a, b).await.unwrap();
        service.add_block(c, a).await.unwrap();
        service.add_block(b, a).await.unwrap();

        assert_eq!(service.blocks(a).await.unwrap(), vec![b, c]);
    }

    #[tokio::test]
    async fn self_and_duplicate_blocks_fail() {
        let service = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        assert!(matches!(
            service.add_block(a, a).await.unwrap_err(),
            RelationError::Validation(_)
        ));
        service.add_block(a, b).await.unwrap();
        assert!(matches!(
            service.add_block(a, b).await.unwrap_err(),
            RelationError::AlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn remove_block_drops_cached_lists() {
        let service = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        service.add_block(a, b).await.unwrap();
        assert_eq!(service.blocks(b).await.unwrap(), vec![a]);
        assert_eq!(service.blocked(b).await.unwrap(), vec![a]);

        assert!(service.remove_block(a, b).await.unwrap());
        assert!(!service.remove_block(a, b).await.unwrap());

        assert!(service.blocks(b).await.unwrap().is_empty());
        assert!(service.blocked(b).await.unwrap().is_empty());
        assert!(service.blocking(a).await.unwrap().is_empty());
        assert!(!service.is_blocked(a, b).await.unwrap());
    }
}
