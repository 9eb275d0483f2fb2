use crate::domain_model::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPairEvent {
    pub from_user: UserId,
    pub to_user: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum DomainEvent {
    #[serde(rename = "connection.request.created")]
    ConnectionRequestCreated(ConnectionRequest),
    #[serde(rename = "connection.request.accepted")]
    ConnectionRequestAccepted(UserPairEvent),
    #[serde(rename = "connection.request.rejected")]
    ConnectionRequestRejected(ConnectionRequest),
    #[serde(rename = "connection.request.canceled")]
    ConnectionRequestCanceled(ConnectionRequest),
    #[serde(rename = "connection.request.viewed")]
    ConnectionRequestViewed(ConnectionRequest),
    #[serde(rename = "connection.removed")]
    ConnectionRemoved(UserPairEvent),
    #[serde(rename = "follow.created")]
    FollowCreated(FollowEdge),
    #[serde(rename = "follow.removed")]
    FollowRemoved(FollowEdge),
    #[serde(rename = "block.created")]
    BlockCreated(BlockEdge),
    #[serde(rename = "block.removed")]
    BlockRemoved(BlockEdge),
    #[serde(rename = "messages.sent")]
    MessagesSent(InvoiceMessage),
    #[serde(rename = "messages.received")]
    MessagesReceived(InvoiceMessage),
    #[serde(rename = "messages.replied")]
    MessagesReplied(InvoiceMessage),
    #[serde(rename = "messages.reply_received")]
    MessagesReplyReceived(InvoiceMessage),
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::ConnectionRequestCreated(_) => "connection.request.created",
            DomainEvent::ConnectionRequestAccepted(_) => "connection.request.accepted",
            DomainEvent::ConnectionRequestRejected(_) => "connection.request.rejected",
            DomainEvent::ConnectionRequestCanceled(_) => "connection.request.canceled",
            DomainEvent::ConnectionRequestViewed(_) => "connection.request.viewed",
            DomainEvent::ConnectionRemoved(_) => "connection.removed",
            DomainEvent::FollowCreated(_) => "follow.created",
            DomainEvent::FollowRemoved(_) => "follow.removed",
            DomainEvent::BlockCreated(_) => "block.created",
            DomainEvent::BlockRemoved(_) => "block.removed",
            DomainEvent::MessagesSent(_) => "messages.sent",
            DomainEvent::MessagesReceived(_) => "messages.received",
            DomainEvent::MessagesReplied(_) => "messages.replied",
            DomainEvent::MessagesReplyReceived(_) => "messages.reply_received",
        }
    }
}

/// An event plus the users it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub receivers: Vec<UserId>,
    pub body: DomainEvent,
}

impl EventEnvelope {
    pub fn new(receivers: Vec<UserId>, body: DomainEvent) -> Self {
        Self { receivers, body }
    }

    pub fn to(receiver: UserId, body: DomainEvent) -> Self {
        Self {
            receivers: vec![receiver],
            body,
        }
    }
}
