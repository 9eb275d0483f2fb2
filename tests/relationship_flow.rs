use chrono::Utc;
use std::sync::Arc;
use tradelink::application_impl::*;
use tradelink::application_port::*;
use tradelink::domain_model::*;
use tradelink::domain_port::UserRecord;
use tradelink::infra_memory::*;

struct App {
    store: Arc<MemoryStore>,
    events: Arc<MemoryEventSink>,
    connections: Arc<dyn ConnectionService>,
    follows: Arc<dyn FollowService>,
    blocks: Arc<dyn BlockService>,
    messaging: Arc<dyn MessagingService>,
    payment: Arc<dyn PaymentService>,
}

fn app() -> App {
    let store = Arc::new(MemoryStore::new());
    let cache: Arc<MemoryRelationCache> = Arc::new(MemoryRelationCache::new());
    let events = Arc::new(MemoryEventSink::new());

    let connections: Arc<dyn ConnectionService> = Arc::new(RealConnectionService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        cache.clone(),
        events.clone(),
    ));
    let follows: Arc<dyn FollowService> = Arc::new(RealFollowService::new(
        store.clone(),
        cache.clone(),
        events.clone(),
    ));
    let blocks: Arc<dyn BlockService> =
        Arc::new(RealBlockService::new(store.clone(), cache, events.clone()));
    let messaging: Arc<dyn MessagingService> = Arc::new(RealMessagingService::new(
        store.clone(),
        store.clone(),
        connections.clone(),
        events.clone(),
    ));
    let payment: Arc<dyn PaymentService> =
        Arc::new(RealPaymentService::new(store.clone(), messaging.clone()));

    App {
        store,
        events,
        connections,
        follows,
        blocks,
        messaging,
        payment,
    }
}

fn document() -> InvoiceDocument {
    InvoiceDocument {
        xml_type: "Invoice".to_string(),
        xml: "<Invoice><ID>42</ID></Invoice>".to_string(),
        peppol_classic: true,
    }
}

fn event_names(app: &App) -> Vec<&'static str> {
    app.events.recorded().iter().map(|e| e.body.name()).collect()
}

#[tokio::test]
async fn request_accept_and_remove() {
    let app = app();
    let alice = UserId::new_random();
    let bob = UserId::new_random();

    let request = app
        .connections
        .add_connection(alice, bob, Some("let's trade"))
        .await
        .unwrap();
    assert_eq!(request.message, "let's trade");
    assert_eq!(app.connections.unread_request_count(bob).await.unwrap(), 1);

    let viewed = app.connections.mark_request_viewed(alice, bob).await.unwrap();
    assert!(viewed.viewed.is_some());
    assert_eq!(app.connections.unread_request_count(bob).await.unwrap(), 0);
    assert_eq!(app.connections.read_requests(bob).await.unwrap().len(), 1);

    app.connections.accept_request(alice, bob).await.unwrap();
    assert!(app.connections.are_connections(alice, bob).await.unwrap());
    assert!(app.connections.are_connections(bob, alice).await.unwrap());
    assert_eq!(app.connections.connections(alice).await.unwrap(), vec![bob]);
    assert!(app.connections.requests(bob).await.unwrap().is_empty());

    assert!(app
        .connections
        .set_partner(alice, bob, PartnerRole::Supplier)
        .await
        .unwrap());
    assert_eq!(app.connections.suppliers(alice).await.unwrap(), vec![bob]);
    assert!(app.connections.costumers(alice).await.unwrap().is_empty());

    assert!(app.connections.remove_connection(alice, bob).await.unwrap());
    assert!(!app.connections.are_connections(alice, bob).await.unwrap());
    assert!(!app.connections.are_connections(bob, alice).await.unwrap());
    assert!(app.connections.suppliers(alice).await.unwrap().is_empty());
    assert!(app.store.connection_rows().await.is_empty());

    assert_eq!(
        event_names(&app),
        vec![
            "connection.request.created",
            "connection.request.viewed",
            "connection.request.accepted",
            "connection.removed",
        ]
    );
}

#[tokio::test]
async fn rejected_and_canceled_requests_leave_no_rows() {
    let app = app();
    let alice = UserId::new_random();
    let bob = UserId::new_random();
    let carol = UserId::new_random();

    app.connections.add_connection(alice, bob, None).await.unwrap();
    app.connections.add_connection(carol, bob, None).await.unwrap();
    assert_eq!(app.connections.unrejected_request_count(bob).await.unwrap(), 2);

    let rejected = app.connections.reject_request(alice, bob).await.unwrap();
    assert!(rejected.rejected.is_some());
    app.connections.cancel_request(carol, bob).await.unwrap();

    assert!(app.connections.requests(bob).await.unwrap().is_empty());
    assert!(app.connections.sent_requests(alice).await.unwrap().is_empty());
    assert!(app.store.request_rows().await.is_empty());

    let err = app.connections.accept_request(alice, bob).await.unwrap_err();
    assert!(matches!(err, RelationError::NotFound(_)));
}

#[tokio::test]
async fn follows_and_blocks_are_directed() {
    let app = app();
    let alice = UserId::new_random();
    let bob = UserId::new_random();

    app.follows.add_follower(alice, bob).await.unwrap();
    assert!(app.follows.follows(alice, bob).await.unwrap());
    assert!(!app.follows.follows(bob, alice).await.unwrap());
    assert_eq!(app.follows.followers(bob).await.unwrap(), vec![alice]);
    assert_eq!(app.follows.following(alice).await.unwrap(), vec![bob]);

    app.blocks.add_block(bob, alice).await.unwrap();
    assert!(app.blocks.is_blocked(bob, alice).await.unwrap());
    assert_eq!(app.blocks.blocking(bob).await.unwrap(), vec![alice]);
    assert_eq!(app.blocks.blocked(alice).await.unwrap(), vec![bob]);
    assert_eq!(app.blocks.blocks(alice).await.unwrap(), vec![bob]);

    assert!(app.follows.remove_follower(alice, bob).await.unwrap());
    assert!(app.blocks.remove_block(bob, alice).await.unwrap());
    assert!(app.follows.followers(bob).await.unwrap().is_empty());
    assert!(app.blocks.blocks(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn invoice_compose_and_reply() {
    let app = app();
    let seller = UserId::new_random();
    let buyer = UserId::new_random();

    let sent = app
        .messaging
        .compose(ComposeInput {
            sender: seller,
            recipient: buyer,
            document: document(),
            parent_msg: None,
        })
        .await
        .unwrap();
    assert_eq!(sent.len(), 1);
    let original = &sent[0];
    assert_eq!(original.subject, INVOICE_SUBJECT);

    // sending opens a connection request toward the recipient
    let pending = app.connections.requests(buyer).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].from_user, seller);

    let reply = app
        .messaging
        .compose(ComposeInput {
            sender: buyer,
            recipient: seller,
            document: document(),
            parent_msg: Some(original.message_id),
        })
        .await
        .unwrap();
    assert_eq!(reply[0].parent_msg, Some(original.message_id));

    let outbox = app.messaging.outbox(seller).await.unwrap();
    assert_eq!(outbox.len(), 1);
    assert!(outbox[0].replied_at.is_some());
    assert_eq!(app.messaging.inbox(seller).await.unwrap().len(), 1);
    assert_eq!(app.messaging.inbox(buyer).await.unwrap().len(), 1);

    let err = app
        .messaging
        .compose(ComposeInput {
            sender: buyer,
            recipient: seller,
            document: document(),
            parent_msg: Some(MessageId(uuid::Uuid::new_v4())),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MessagingError::ParentNotFound(_)));
    assert_eq!(app.messaging.outbox(buyer).await.unwrap().len(), 1);
}

#[tokio::test]
async fn payment_resolves_recipient_and_sends_invoice() {
    let app = app();
    let shop = UserId::new_random();
    let buyer = UserId::new_random();
    app.store
        .insert_user(UserRecord {
            user_id: shop,
            username: "fjord-supplies".to_string(),
            web_id: Some("https://fjord.example/profile#me".to_string()),
            peppol_id: Some("0192:987654321".to_string()),
            is_active: true,
            created_at: Utc::now(),
        })
        .await;

    let receipt = app
        .payment
        .pay(
            buyer,
            PaymentRequest {
                email: "buyer@example.com".to_string(),
                recipient: " 0192:987654321 ".to_string(),
                document: document(),
            },
        )
        .await
        .unwrap();
    assert_eq!(receipt.recipient, shop);
    assert_eq!(receipt.matched_by, RecipientMatch::PeppolId);
    assert_eq!(receipt.contact_email, "buyer@example.com");
    assert_eq!(app.messaging.inbox(shop).await.unwrap().len(), 1);

    let err = app
        .payment
        .pay(
            buyer,
            PaymentRequest {
                email: "buyer@example.com".to_string(),
                recipient: "nobody".to_string(),
                document: document(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::RecipientNotFound(_)));
}
