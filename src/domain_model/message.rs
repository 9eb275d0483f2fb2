use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INVOICE_SUBJECT: &str = "Invoice";
pub const INVOICE_BODY: &str = "Yooo we send you the Invoice for your order.";

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct MessageId(pub uuid::Uuid);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured document attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub xml_type: String,
    pub xml: String,
    pub peppol_classic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceMessage {
    pub message_id: MessageId,
    pub sender: UserId,
    pub recipient: UserId,
    pub subject: String,
    pub body: String,
    pub document: InvoiceDocument,
    pub parent_msg: Option<MessageId>,
    pub sent_at: DateTime<Utc>,
    pub replied_at: Option<DateTime<Utc>>,
}

impl InvoiceMessage {
    pub fn compose(
        sender: UserId,
        recipient: UserId,
        document: InvoiceDocument,
        parent_msg: Option<MessageId>,
    ) -> Self {
        Self {
            message_id: MessageId(uuid::Uuid::new_v4()),
            sender,
            recipient,
            subject: INVOICE_SUBJECT.to_owned(),
            body: INVOICE_BODY.to_owned(),
            document,
            parent_msg,
            sent_at: Utc::now(),
            replied_at: None,
        }
    }
}
