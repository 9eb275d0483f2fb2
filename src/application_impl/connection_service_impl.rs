use crate::application_impl::CacheFacade;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use std::sync::Arc;

pub struct RealConnectionService {
    connection_repo: Arc<dyn ConnectionRepo>,
    request_repo: Arc<dyn ConnectionRequestRepo>,
    tx_manager: Arc<dyn TxManager>,
    cache: CacheFacade,
    events: Arc<dyn EventSink>,
}

impl RealConnectionService {
    pub fn new(
        connection_repo: Arc<dyn ConnectionRepo>,
        request_repo: Arc<dyn ConnectionRequestRepo>,
        tx_manager: Arc<dyn TxManager>,
        cache: Arc<dyn RelationCache>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            connection_repo,
            request_repo,
            tx_manager,
            cache: CacheFacade::new(cache),
            events,
        }
    }

    async fn received(
        &self,
        kind: CacheKind,
        user: UserId,
        filter: RequestFilter,
    ) -> Result<Vec<ConnectionRequest>, RelationError> {
        self.cache
            .read_through(kind.key(user), || self.request_repo.list_received(user, filter))
            .await
    }

    async fn received_count(
        &self,
        kind: CacheKind,
        user: UserId,
        filter: RequestFilter,
    ) -> Result<u64, RelationError> {
        self.cache
            .read_through(kind.key(user), || self.request_repo.count_received(user, filter))
            .await
    }

    async fn pending(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<ConnectionRequest, RelationError> {
        self.request_repo
            .get(from_user, to_user)
            .await?
            .ok_or_else(|| {
                RelationError::NotFound(format!(
                    "no connection request from {from_user} to {to_user}"
                ))
            })
    }

    /// Both edges and both request deletions land in one transaction.
    async fn accept_in_tx(&self, request: &ConnectionRequest) -> Result<(), RelationError> {
        let (from_user, to_user) = (request.from_user, request.to_user);
        let mut tx = self.tx_manager.begin().await?;

        let now = Utc::now();
        for edge in [
            ConnectionEdge::new(from_user, to_user, now),
            ConnectionEdge::new(to_user, from_user, now),
        ] {
            if let InsertOutcome::Duplicate =
                self.connection_repo.insert_in_tx(&mut *tx, &edge).await?
            {
                tx.rollback().await?;
                return Err(RelationError::AlreadyExists(
                    "you are already connections".to_string(),
                ));
            }
        }

        let deleted = self
            .request_repo
            .delete_in_tx(&mut *tx, from_user, to_user)
            .await?;
        if !deleted {
            // lost a race with reject / cancel / another accept
            tx.rollback().await?;
            return Err(RelationError::NotFound(format!(
                "no connection request from {from_user} to {to_user}"
            )));
        }
        self.request_repo
            .delete_in_tx(&mut *tx, to_user, from_user)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConnectionService for RealConnectionService {
    async fn connections(&self, user: UserId) -> Result<Vec<UserId>, RelationError> {
        self.cache
            .read_through(CacheKind::Connections.key(user), || {
                self.connection_repo.list_connections(user)
            })
            .await
    }

    async fn suppliers(&self, user: UserId) -> Result<Vec<UserId>, RelationError> {
        Ok(self
            .connection_repo
            .list_partners(user, PartnerRole::Supplier)
            .await?)
    }

    async fn costumers(&self, user: UserId) -> Result<Vec<UserId>, RelationError> {
        Ok(self
            .connection_repo
            .list_partners(user, PartnerRole::Costumer)
            .await?)
    }

    async fn are_connections(&self, a: UserId, b: UserId) -> Result<bool, RelationError> {
        if self
            .cache
            .cached_list_contains(CacheKind::Connections.key(a), b)
            .await
            || self
                .cache
                .cached_list_contains(CacheKind::Connections.key(b), a)
                .await
        {
            return Ok(true);
        }

        Ok(self.connection_repo.exists(b, a).await?)
    }

    async fn remove_connection(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<bool, RelationError> {
        let removed = self
            .connection_repo
            .delete_between(from_user, to_user)
            .await?;
        if removed == 0 {
            return Ok(false);
        }

        self.events
            .emit(EventEnvelope::new(
                vec![from_user, to_user],
                DomainEvent::ConnectionRemoved(UserPairEvent { from_user, to_user }),
            ))
            .await;

        self.cache
            .bust(&[
                (CacheKind::Connections, to_user),
                (CacheKind::Connections, from_user),
                (CacheKind::SentRequests, to_user),
                (CacheKind::SentRequests, from_user),
            ])
            .await;

        Ok(true)
    }

    async fn set_partner(
        &self,
        from_user: UserId,
        to_user: UserId,
        role: PartnerRole,
    ) -> Result<bool, RelationError> {
        Ok(self
            .connection_repo
            .set_partner_flag(from_user, to_user, role, true)
            .await?)
    }

    async fn remove_partner(
        &self,
        from_user: UserId,
        to_user: UserId,
        role: PartnerRole,
    ) -> Result<bool, RelationError> {
        Ok(self
            .connection_repo
            .set_partner_flag(from_user, to_user, role, false)
            .await?)
    }

    async fn requests(&self, user: UserId) -> Result<Vec<ConnectionRequest>, RelationError> {
        self.received(CacheKind::Requests, user, RequestFilter::All)
            .await
    }

    async fn sent_requests(&self, user: UserId) -> Result<Vec<ConnectionRequest>, RelationError> {
        self.cache
            .read_through(CacheKind::SentRequests.key(user), || {
                self.request_repo.list_sent(user)
            })
            .await
    }

    async fn unread_requests(
        &self,
        user: UserId,
    ) -> Result<Vec<ConnectionRequest>, RelationError> {
        self.received(CacheKind::UnreadRequests, user, RequestFilter::Unread)
            .await
    }

    async fn unread_request_count(&self, user: UserId) -> Result<u64, RelationError> {
        self.received_count(CacheKind::UnreadRequestCount, user, RequestFilter::Unread)
            .await
    }

    async fn read_requests(&self, user: UserId) -> Result<Vec<ConnectionRequest>, RelationError> {
        self.received(CacheKind::ReadRequests, user, RequestFilter::Read)
            .await
    }

    async fn rejected_requests(
        &self,
        user: UserId,
    ) -> Result<Vec<ConnectionRequest>, RelationError> {
        self.received(CacheKind::RejectedRequests, user, RequestFilter::Rejected)
            .await
    }

    async fn unrejected_requests(
        &self,
        user: UserId,
    ) -> Result<Vec<ConnectionRequest>, RelationError> {
        self.received(CacheKind::UnrejectedRequests, user, RequestFilter::Unrejected)
            .await
    }

    async fn unrejected_request_count(&self, user: UserId) -> Result<u64, RelationError> {
        self.received_count(
            CacheKind::UnrejectedRequestCount,
            user,
            RequestFilter::Unrejected,
        )
        .await
    }

    async fn add_connection(
        &self,
        from_user: UserId,
        to_user: UserId,
        message: Option<&str>,
    ) -> Result<ConnectionRequest, RelationError> {
        // self-pair is reported as AlreadyExists, before any lookup
        if from_user == to_user {
            return Err(RelationError::AlreadyExists(
                "users cannot contact themselves".to_string(),
            ));
        }
        if self.are_connections(from_user, to_user).await? {
            return Err(RelationError::AlreadyExists(
                "you are already connections".to_string(),
            ));
        }
        if self.request_repo.exists(from_user, to_user).await? {
            return Err(RelationError::AlreadyExists(
                "you already requested connection from this user".to_string(),
            ));
        }
        if self.request_repo.exists(to_user, from_user).await? {
            return Err(RelationError::AlreadyExists(
                "this user already requested connection from you".to_string(),
            ));
        }

        let request = ConnectionRequest::new(
            from_user,
            to_user,
            message.unwrap_or_default().to_owned(),
            Utc::now(),
        );
        if let InsertOutcome::Duplicate = self.request_repo.insert(&request).await? {
            return Err(RelationError::AlreadyExists(
                "connection already requested".to_string(),
            ));
        }

        self.cache
            .bust(&[
                (CacheKind::Requests, to_user),
                (CacheKind::SentRequests, from_user),
            ])
            .await;
        self.events
            .emit(EventEnvelope::to(
                to_user,
                DomainEvent::ConnectionRequestCreated(request.clone()),
            ))
            .await;

        tracing::debug!(%from_user, %to_user, "connection requested");
        Ok(request)
    }

    async fn accept_request(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<(), RelationError> {
        let request = self.pending(from_user, to_user).await?;
        self.accept_in_tx(&request).await?;

        self.events
            .emit(EventEnvelope::new(
                vec![from_user, to_user],
                DomainEvent::ConnectionRequestAccepted(UserPairEvent { from_user, to_user }),
            ))
            .await;

        self.cache
            .bust(&[
                (CacheKind::Requests, to_user),
                (CacheKind::SentRequests, from_user),
                (CacheKind::Requests, from_user),
                (CacheKind::SentRequests, to_user),
                (CacheKind::Connections, to_user),
                (CacheKind::Connections, from_user),
            ])
            .await;

        tracing::debug!(%from_user, %to_user, "connection request accepted");
        Ok(())
    }

    async fn reject_request(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<ConnectionRequest, RelationError> {
        let mut request = self.pending(from_user, to_user).await?;
        request.rejected = Some(Utc::now());

        if !self.request_repo.delete(from_user, to_user).await? {
            return Err(RelationError::NotFound(format!(
                "no connection request from {from_user} to {to_user}"
            )));
        }

        self.events
            .emit(EventEnvelope::to(
                from_user,
                DomainEvent::ConnectionRequestRejected(request.clone()),
            ))
            .await;
        self.cache
            .bust(&[
                (CacheKind::Requests, to_user),
                (CacheKind::SentRequests, from_user),
            ])
            .await;

        Ok(request)
    }

    async fn cancel_request(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<(), RelationError> {
        let request = self.pending(from_user, to_user).await?;

        if !self.request_repo.delete(from_user, to_user).await? {
            return Err(RelationError::NotFound(format!(
                "no connection request from {from_user} to {to_user}"
            )));
        }

        self.events
            .emit(EventEnvelope::to(
                to_user,
                DomainEvent::ConnectionRequestCanceled(request),
            ))
            .await;
        self.cache
            .bust(&[
                (CacheKind::Requests, to_user),
                (CacheKind::SentRequests, from_user),
                (CacheKind::Requests, from_user),
                (CacheKind::SentRequests, to_user),
            ])
            .await;

        Ok(())
    }

    async fn mark_request_viewed(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<ConnectionRequest, RelationError> {
        let mut request = self.pending(from_user, to_user).await?;
        let viewed_at = Utc::now();

        if !self
            .request_repo
            .mark_viewed(from_user, to_user, viewed_at)
            .await?
        {
            return Err(RelationError::NotFound(format!(
                "no connection request from {from_user} to {to_user}"
            )));
        }
        request.viewed = Some(viewed_at);

        self.events
            .emit(EventEnvelope::to(
                from_user,
                DomainEvent::ConnectionRequestViewed(request.clone()),
            ))
            .await;
        self.cache.bust(&[(CacheKind::Requests, to_user)]).await;

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::*;
    use chrono::DateTime;

    struct Fixture {
        store: Arc<MemoryStore>,
        cache: Arc<MemoryRelationCache>,
        events: Arc<MemoryEventSink>,
        service: RealConnectionService,
    }

    fn setup() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryRelationCache::new());
        let events = Arc::new(MemoryEventSink::new());
        let service = RealConnectionService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            cache.clone(),
            events.clone(),
        );
        Fixture {
            store,
            cache,
            events,
            service,
        }
    }

    fn users() -> (UserId, UserId) {
        (UserId::new_random(), UserId::new_random())
    }

    #[tokio::test]
    async fn self_request_is_already_exists() {
        let f = setup();
        let a = UserId::new_random();

        let err = f.service.add_connection(a, a, None).await.unwrap_err();
        assert!(matches!(err, RelationError::AlreadyExists(_)));
        assert!(f.events.recorded().is_empty());
    }

    #[tokio::test]
    async fn duplicate_request_is_already_exists() {
        let f = setup();
        let (a, b) = users();

        f.service.add_connection(a, b, Some("hi")).await.unwrap();
        let err = f.service.add_connection(a, b, None).await.unwrap_err();
        assert!(matches!(err, RelationError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn reverse_request_blocks_creation() {
        let f = setup();
        let (a, b) = users();

        f.service.add_connection(a, b, None).await.unwrap();
        let err = f.service.add_connection(b, a, None).await.unwrap_err();
        assert!(matches!(err, RelationError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn request_keeps_message_and_busts_both_sides() {
        let f = setup();
        let (a, b) = users();

        assert!(f.service.requests(b).await.unwrap().is_empty());
        assert!(f.service.sent_requests(a).await.unwrap().is_empty());

        let request = f.service.add_connection(a, b, Some("let's trade")).await.unwrap();
        assert_eq!(request.message, "let's trade");

        let received = f.service.requests(b).await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].from_user, a);
        assert_eq!(f.service.sent_requests(a).await.unwrap().len(), 1);
        assert_eq!(f.service.unread_request_count(b).await.unwrap(), 1);

        let names: Vec<_> = f.events.recorded().iter().map(|e| e.body.name()).collect();
        assert_eq!(names, vec!["connection.request.created"]);
    }

    #[tokio::test]
    async fn accept_creates_both_edges_and_clears_requests() {
        let f = setup();
        let (a, b) = users();

        f.service.add_connection(a, b, None).await.unwrap();
        // warm every cache the accept has to drop
        f.service.requests(b).await.unwrap();
        f.service.sent_requests(a).await.unwrap();
        f.service.connections(a).await.unwrap();
        f.service.connections(b).await.unwrap();

        f.service.accept_request(a, b).await.unwrap();

        assert!(f.service.are_connections(a, b).await.unwrap());
        assert!(f.service.are_connections(b, a).await.unwrap());
        assert_eq!(f.service.connections(a).await.unwrap(), vec![b]);
        assert_eq!(f.service.connections(b).await.unwrap(), vec![a]);
        assert!(f.service.requests(b).await.unwrap().is_empty());
        assert!(f.service.sent_requests(a).await.unwrap().is_empty());
        assert!(f.store.request_rows().await.is_empty());
    }

    #[tokio::test]
    async fn accept_removes_reverse_request() {
        let f = setup();
        let (a, b) = users();

        f.service.add_connection(a, b, None).await.unwrap();
        // reverse row that slipped past the creation check
        ConnectionRequestRepo::insert(
            &*f.store,
            &ConnectionRequest::new(b, a, String::new(), Utc::now()),
        )
        .await
        .unwrap();

        f.service.accept_request(a, b).await.unwrap();

        assert!(f.store.request_rows().await.is_empty());
        assert!(f.service.requests(a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn accept_rolls_back_when_edge_exists() {
        let f = setup();
        let (a, b) = users();

        f.service.add_connection(a, b, None).await.unwrap();
        f.store
            .seed_connection(ConnectionEdge::new(b, a, Utc::now()))
            .await;

        let err = f.service.accept_request(a, b).await.unwrap_err();
        assert!(matches!(err, RelationError::AlreadyExists(_)));
        // nothing from the failed transaction is visible
        assert_eq!(f.store.request_rows().await.len(), 1);
        assert_eq!(f.store.connection_rows().await.len(), 1);
    }

    #[tokio::test]
    async fn reject_and_cancel_delete_the_row() {
        let f = setup();
        let (a, b) = users();
        let c = UserId::new_random();

        f.service.add_connection(a, b, None).await.unwrap();
        f.service.add_connection(c, b, None).await.unwrap();
        assert_eq!(f.service.requests(b).await.unwrap().len(), 2);

        let rejected = f.service.reject_request(a, b).await.unwrap();
        assert!(rejected.rejected.is_some());
        f.service.cancel_request(c, b).await.unwrap();

        assert!(f.service.requests(b).await.unwrap().is_empty());
        assert!(f.service.sent_requests(a).await.unwrap().is_empty());
        assert!(f.service.sent_requests(c).await.unwrap().is_empty());
        assert!(f.service.rejected_requests(b).await.unwrap().is_empty());

        let err = f.service.reject_request(a, b).await.unwrap_err();
        assert!(matches!(err, RelationError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_viewed_moves_request_from_unread_to_read() {
        let f = setup();
        let (a, b) = users();

        f.service.add_connection(a, b, None).await.unwrap();
        assert_eq!(f.service.unread_requests(b).await.unwrap().len(), 1);
        assert!(f.service.read_requests(b).await.unwrap().is_empty());

        let viewed = f.service.mark_request_viewed(a, b).await.unwrap();
        assert!(viewed.viewed.is_some());

        assert!(f.service.unread_requests(b).await.unwrap().is_empty());
        assert_eq!(f.service.unread_request_count(b).await.unwrap(), 0);
        assert_eq!(f.service.read_requests(b).await.unwrap().len(), 1);
        assert_eq!(f.service.requests(b).await.unwrap().len(), 1);
        assert_eq!(f.service.unrejected_request_count(b).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn remove_connection_busts_cached_list() {
        let f = setup();
        let (a, b) = users();

        f.service.add_connection(a, b, None).await.unwrap();
        f.service.accept_request(a, b).await.unwrap();
        assert_eq!(f.service.connections(a).await.unwrap(), vec![b]);
        assert!(f.cache.holds(&CacheKind::Connections.key(a)));

        assert!(f.service.remove_connection(a, b).await.unwrap());

        assert!(f.service.connections(a).await.unwrap().is_empty());
        assert!(f.service.connections(b).await.unwrap().is_empty());
        assert!(!f.service.are_connections(a, b).await.unwrap());
        assert!(!f.service.remove_connection(a, b).await.unwrap());
    }

    #[tokio::test]
    async fn cached_positive_is_authoritative_and_stale_miss_falls_through() {
        let f = setup();
        let (a, b) = users();

        // cached list holding the counterpart wins without touching the store
        f.cache
            .set(&CacheKind::Connections.key(a), &CachedValue::Users(vec![b]))
            .await
            .unwrap();
        assert!(f.service.are_connections(a, b).await.unwrap());

        // a cached list lacking the counterpart still consults the store
        let c = UserId::new_random();
        f.cache
            .set(&CacheKind::Connections.key(c), &CachedValue::Users(vec![]))
            .await
            .unwrap();
        f.store
            .seed_connection(ConnectionEdge::new(a, c, Utc::now()))
            .await;
        assert!(f.service.are_connections(c, a).await.unwrap());
    }

    #[tokio::test]
    async fn connections_never_contain_owner() {
        let f = setup();
        let (a, b) = users();
        let c = UserId::new_random();

        f.service.add_connection(a, b, None).await.unwrap();
        f.service.add_connection(c, a, None).await.unwrap();
        f.service.accept_request(a, b).await.unwrap();
        f.service.accept_request(c, a).await.unwrap();

        let list = f.service.connections(a).await.unwrap();
        assert_eq!(list, vec![b, c]);
        assert!(!list.contains(&a));
    }

    #[tokio::test]
    async fn partner_flags_toggle_on_existing_edge_only() {
        let f = setup();
        let (a, b) = users();

        assert!(
            !f.service
                .set_partner(a, b, PartnerRole::Supplier)
                .await
                .unwrap()
        );

        f.service.add_connection(a, b, None).await.unwrap();
        f.service.accept_request(a, b).await.unwrap();

        assert!(f.service.set_partner(a, b, PartnerRole::Supplier).await.unwrap());
        assert!(f.service.set_partner(a, b, PartnerRole::Costumer).await.unwrap());
        assert_eq!(f.service.suppliers(a).await.unwrap(), vec![b]);
        assert_eq!(f.service.costumers(a).await.unwrap(), vec![b]);
        assert!(f.service.suppliers(b).await.unwrap().is_empty());

        assert!(
            f.service
                .remove_partner(a, b, PartnerRole::Supplier)
                .await
                .unwrap()
        );
        assert!(f.service.suppliers(a).await.unwrap().is_empty());
        assert_eq!(f.service.costumers(a).await.unwrap(), vec![b]);
    }

    /// Reports every pair as absent but loses every insert, like a writer
    /// that passed the pre-checks while another request committed first.
    struct RacingRequestRepo {
        inner: Arc<MemoryStore>,
    }

    #[async_trait::async_trait]
    impl ConnectionRequestRepo for RacingRequestRepo {
        async fn insert(&self, _request: &ConnectionRequest) -> Result<InsertOutcome, StoreError> {
            Ok(InsertOutcome::Duplicate)
        }

        async fn get(
            &self,
            from_user: UserId,
            to_user: UserId,
        ) -> Result<Option<ConnectionRequest>, StoreError> {
            ConnectionRequestRepo::get(&*self.inner, from_user, to_user).await
        }

        async fn exists(&self, _from_user: UserId, _to_user: UserId) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn list_received(
            &self,
            user: UserId,
            filter: RequestFilter,
        ) -> Result<Vec<ConnectionRequest>, StoreError> {
            ConnectionRequestRepo::list_received(&*self.inner, user, filter).await
        }

        async fn count_received(
            &self,
            user: UserId,
            filter: RequestFilter,
        ) -> Result<u64, StoreError> {
            ConnectionRequestRepo::count_received(&*self.inner, user, filter).await
        }

        async fn list_sent(&self, user: UserId) -> Result<Vec<ConnectionRequest>, StoreError> {
            ConnectionRequestRepo::list_sent(&*self.inner, user).await
        }

        async fn mark_viewed(
            &self,
            from_user: UserId,
            to_user: UserId,
            at: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            ConnectionRequestRepo::mark_viewed(&*self.inner, from_user, to_user, at).await
        }

        async fn delete(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError> {
            ConnectionRequestRepo::delete(&*self.inner, from_user, to_user).await
        }

        async fn delete_in_tx<'t>(
            &self,
            tx: &mut dyn StorageTx<'t>,
            from_user: UserId,
            to_user: UserId,
        ) -> Result<bool, StoreError> {
            ConnectionRequestRepo::delete_in_tx(&*self.inner, tx, from_user, to_user).await
        }
    }

    #[tokio::test]
    async fn request_losing_insert_race_is_already_exists() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryRelationCache::new());
        let events = Arc::new(MemoryEventSink::new());
        let service = RealConnectionService::new(
            store.clone(),
            Arc::new(RacingRequestRepo {
                inner: store.clone(),
            }),
            store.clone(),
            cache.clone(),
            events.clone(),
        );
        let (a, b) = users();

        assert!(service.requests(b).await.unwrap().is_empty());
        assert!(service.sent_requests(a).await.unwrap().is_empty());

        let err = service.add_connection(a, b, Some("hi")).await.unwrap_err();
        assert!(matches!(err, RelationError::AlreadyExists(_)));
        assert!(events.recorded().is_empty());
        assert!(cache.holds(&CacheKind::Requests.key(b)));
        assert!(cache.holds(&CacheKind::SentRequests.key(a)));
        assert!(store.request_rows().await.is_empty());
    }
}
