use crate::application_impl::CacheFacade;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use std::sync::Arc;

pub struct RealFollowService {
    follow_repo: Arc<dyn FollowRepo>,
    cache: CacheFacade,
    events: Arc<dyn EventSink>,
}

impl RealFollowService {
    pub fn new(
        follow_repo: Arc<dyn FollowRepo>,
        cache: Arc<dyn RelationCache>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            follow_repo,
            cache: CacheFacade::new(cache),
            events,
        }
    }

    async fn bust_pair(&self, edge: &FollowEdge) {
        self.cache
            .bust(&[
                (CacheKind::Followers, edge.followee),
                (CacheKind::Following, edge.follower),
            ])
            .await;
    }
}

#[async_trait::async_trait]
impl FollowService for RealFollowService {
    async fn followers(&self, user: UserId) -> Result<Vec<UserId>, RelationError> {
        self.cache
            .read_through(CacheKind::Followers.key(user), || {
                self.follow_repo.list_followers(user)
            })
            .await
    }

    async fn following(&self, user: UserId) -> Result<Vec<UserId>, RelationError> {
        self.cache
            .read_through(CacheKind::Following.key(user), || {
                self.follow_repo.list_following(user)
            })
            .await
    }

    async fn add_follower(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<FollowEdge, RelationError> {
        if follower == followee {
            return Err(RelationError::Validation(
                "users cannot follow themselves".to_string(),
            ));
        }

        let edge = FollowEdge {
            follower,
            followee,
            created: Utc::now(),
        };
        if let InsertOutcome::Duplicate = self.follow_repo.insert(&edge).await? {
            return Err(RelationError::AlreadyExists(format!(
                "{follower} already follows {followee}"
            )));
        }

        self.events
            .emit(EventEnvelope::new(
                vec![follower, followee],
                DomainEvent::FollowCreated(edge.clone()),
            ))
            .await;
        self.bust_pair(&edge).await;

        Ok(edge)
    }

    async fn remove_follower(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<bool, RelationError> {
        let Some(edge) = self.follow_repo.get(follower, followee).await? else {
            return Ok(false);
        };
        if !self.follow_repo.delete(follower, followee).await? {
            return Ok(false);
        }

        self.events
            .emit(EventEnvelope::new(
                vec![follower, followee],
                DomainEvent::FollowRemoved(edge.clone()),
            ))
            .await;
        self.bust_pair(&edge).await;

        Ok(true)
    }

    async fn follows(&self, follower: UserId, followee: UserId) -> Result<bool, RelationError> {
        if self
            .cache
            .cached_list_contains(CacheKind::Following.key(follower), followee)
            .await
            || self
                .cache
                .cached_list_contains(CacheKind::Followers.key(followee), follower)
                .await
        {
            return Ok(true);
        }

        Ok(self.follow_repo.exists(follower, followee).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::*;

    fn setup() -> (Arc<MemoryStore>, Arc<MemoryEventSink>, RealFollowService) {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(MemoryEventSink::new());
        let service = RealFollowService::new(
            store.clone(),
            Arc::new(MemoryRelationCache::new()),
            events.clone(),
        );
        (store, events, service)
    }

    #[tokio::test]
    async fn follow_is_one_directional() {
        let (_, events, service) = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        assert!(service.followers(b).await.unwrap().is_empty());
        service.add_follower(a, b).await.unwrap();

        assert_eq!(service.followers(b).await.unwrap(), vec![a]);
        assert_eq!(service.following(a).await.unwrap(), vec![b]);
        assert!(service.follows(a, b).await.unwrap());
        assert!(!service.follows(b, a).await.unwrap());

        let names: Vec<_> = events.recorded().iter().map(|e| e.body.name()).collect();
        assert_eq!(names, vec!["follow.created"]);
    }

    #[tokio::test]
    async fn self_follow_is_validation_error() {
        let (_, _, service) = setup();
        let a = UserId::new_random();

        let err = service.add_follower(a, a).await.unwrap_err();
        assert!(matches!(err, RelationError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_follow_is_already_exists() {
        let (_, _, service) = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        service.add_follower(a, b).await.unwrap();
        let err = service.add_follower(a, b).await.unwrap_err();
        assert!(matches!(err, RelationError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn remove_follower_reports_absence() {
        let (_, events, service) = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        assert!(!service.remove_follower(a, b).await.unwrap());

        service.add_follower(a, b).await.unwrap();
        assert_eq!(service.following(a).await.unwrap(), vec![b]);
        assert!(service.remove_follower(a, b).await.unwrap());

        assert!(service.following(a).await.unwrap().is_empty());
        assert!(service.followers(b).await.unwrap().is_empty());
        assert!(!service.follows(a, b).await.unwrap());
        assert_eq!(events.recorded().len(), 2);
    }

    #[tokio::test]
    async fn follows_falls_back_to_store_on_stale_cache() {
        let (store, _, service) = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        // cache an empty following list, then write behind its back
        assert!(service.following(a).await.unwrap().is_empty());
        FollowRepo::insert(
            &*store,
            &FollowEdge {
                follower: a,
                followee: b,
                created: Utc::now(),
            },
        )
        .await
        .unwrap();

        assert!(service.follows(a, b).await.unwrap());
    }
}
