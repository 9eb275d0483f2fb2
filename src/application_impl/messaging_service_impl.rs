use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub struct RealMessagingService {
    message_repo: Arc<dyn MessageRepo>,
    tx_manager: Arc<dyn TxManager>,
    connection_service: Arc<dyn ConnectionService>,
    events: Arc<dyn EventSink>,
}

impl RealMessagingService {
    pub fn new(
        message_repo: Arc<dyn MessageRepo>,
        tx_manager: Arc<dyn TxManager>,
        connection_service: Arc<dyn ConnectionService>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            message_repo,
            tx_manager,
            connection_service,
            events,
        }
    }

    /// Sending an invoice also asks the recipient to connect. A request or
    /// connection that already exists is fine.
    async fn ensure_connection_requested(
        &self,
        sender: UserId,
        recipient: UserId,
    ) -> Result<(), MessagingError> {
        match self
            .connection_service
            .add_connection(sender, recipient, None)
            .await
        {
            Ok(_) | Err(RelationError::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store_message(&self, message: &InvoiceMessage) -> Result<(), MessagingError> {
        let mut tx = self.tx_manager.begin().await?;

        if let Some(parent) = message.parent_msg {
            let found = self
                .message_repo
                .mark_replied_in_tx(&mut *tx, parent, message.sent_at)
                .await?;
            if !found {
                tx.rollback().await?;
                return Err(MessagingError::ParentNotFound(parent));
            }
        }
        self.message_repo.insert_in_tx(&mut *tx, message).await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MessagingService for RealMessagingService {
    async fn compose(&self, input: ComposeInput) -> Result<Vec<InvoiceMessage>, MessagingError> {
        let ComposeInput {
            sender,
            recipient,
            document,
            parent_msg,
        } = input;

        // must fail before any connection side effect; the in-tx stamp covers a
        // parent deleted in between
        if let Some(parent) = parent_msg {
            if self.message_repo.get(parent).await?.is_none() {
                return Err(MessagingError::ParentNotFound(parent));
            }
        }

        self.ensure_connection_requested(sender, recipient).await?;

        let message = InvoiceMessage::compose(sender, recipient, document, parent_msg);
        self.store_message(&message).await?;

        let (to_sender, to_recipient) = if parent_msg.is_some() {
            (
                DomainEvent::MessagesReplied(message.clone()),
                DomainEvent::MessagesReplyReceived(message.clone()),
            )
        } else {
            (
                DomainEvent::MessagesSent(message.clone()),
                DomainEvent::MessagesReceived(message.clone()),
            )
        };
        self.events.emit(EventEnvelope::to(sender, to_sender)).await;
        self.events
            .emit(EventEnvelope::to(recipient, to_recipient))
            .await;

        tracing::info!(message_id = %message.message_id, %sender, %recipient, "invoice message sent");
        Ok(vec![message])
    }

    async fn inbox(&self, user: UserId) -> Result<Vec<InvoiceMessage>, MessagingError> {
        Ok(self.message_repo.list_received(user).await?)
    }

    async fn outbox(&self, user: UserId) -> Result<Vec<InvoiceMessage>, MessagingError> {
        Ok(self.message_repo.list_sent(user).await?)
    }
}

#[cfg(test)]
pub(crate) fn sample_document() -> InvoiceDocument {
    InvoiceDocument {
        xml_type: "Invoice".to_string(),
        xml: "<Invoice/>".to_string(),
        peppol_classic: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::RealConnectionService;
    use crate::infra_memory::*;

    struct Fixture {
        events: Arc<MemoryEventSink>,
        connections: Arc<RealConnectionService>,
        service: RealMessagingService,
    }

    fn setup() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(MemoryEventSink::new());
        let connections = Arc::new(RealConnectionService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(MemoryRelationCache::new()),
            events.clone(),
        ));
        let service = RealMessagingService::new(
            store.clone(),
            store.clone(),
            connections.clone(),
            events.clone(),
        );
        Fixture {
            events,
            connections,
            service,
        }
    }

    fn input(sender: UserId, recipient: UserId, parent_msg: Option<MessageId>) -> ComposeInput {
        ComposeInput {
            sender,
            recipient,
            document: sample_document(),
            parent_msg,
        }
    }

    #[tokio::test]
    async fn compose_sends_invoice_and_requests_connection() {
        let f = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        let sent = f.service.compose(input(a, b, None)).await.unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, INVOICE_SUBJECT);
        assert_eq!(sent[0].body, INVOICE_BODY);

        assert_eq!(f.connections.requests(b).await.unwrap().len(), 1);
        assert_eq!(f.service.inbox(b).await.unwrap(), sent);
        assert_eq!(f.service.outbox(a).await.unwrap(), sent);

        let names: Vec<_> = f.events.recorded().iter().map(|e| e.body.name()).collect();
        assert_eq!(
            names,
            vec![
                "connection.request.created",
                "messages.sent",
                "messages.received"
            ]
        );
    }

    #[tokio::test]
    async fn compose_tolerates_existing_connection() {
        let f = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        f.connections.add_connection(a, b, None).await.unwrap();
        f.connections.accept_request(a, b).await.unwrap();

        f.service.compose(input(b, a, None)).await.unwrap();
        f.service.compose(input(b, a, None)).await.unwrap();
        assert_eq!(f.service.inbox(a).await.unwrap().len(), 2);
        assert!(f.connections.requests(a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn self_addressed_invoice_is_still_stored() {
        let f = setup();
        let a = UserId::new_random();

        f.service.compose(input(a, a, None)).await.unwrap();
        assert_eq!(f.service.inbox(a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reply_stamps_parent() {
        let f = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        let first = f.service.compose(input(a, b, None)).await.unwrap();
        let parent = first[0].message_id;
        let reply = f.service.compose(input(b, a, Some(parent))).await.unwrap();
        assert_eq!(reply[0].parent_msg, Some(parent));

        let outbox = f.service.outbox(a).await.unwrap();
        assert!(outbox[0].replied_at.is_some());

        let last: Vec<_> = f
            .events
            .recorded()
            .iter()
            .rev()
            .take(2)
            .map(|e| e.body.name())
            .collect();
        assert_eq!(last, vec!["messages.reply_received", "messages.replied"]);
    }

    #[tokio::test]
    async fn reply_to_unknown_parent_stores_nothing() {
        let f = setup();
        let (a, b) = (UserId::new_random(), UserId::new_random());
        let ghost = MessageId(uuid::Uuid::new_v4());

        let err = f.service.compose(input(a, b, Some(ghost))).await.unwrap_err();
        assert!(matches!(err, MessagingError::ParentNotFound(id) if id == ghost));
        assert!(f.service.inbox(b).await.unwrap().is_empty());
        assert!(f.connections.requests(b).await.unwrap().is_empty());
        assert!(f.connections.sent_requests(a).await.unwrap().is_empty());
        assert!(f.events.recorded().is_empty());
    }
}
