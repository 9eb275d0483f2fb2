use crate::application_port::RelationError;
use crate::domain_model::*;
use crate::domain_port::StoreError;

#[derive(Debug, Clone)]
pub struct ComposeInput {
    pub sender: UserId,
    pub recipient: UserId,
    pub document: InvoiceDocument,
    pub parent_msg: Option<MessageId>,
}

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("parent message not found: {0}")]
    ParentNotFound(MessageId),
    #[error("relation error: {0}")]
    Relation(#[from] RelationError),
    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for MessagingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Backend(e) => MessagingError::Store(e),
        }
    }
}

#[async_trait::async_trait]
pub trait MessagingService: Send + Sync {
    async fn compose(&self, input: ComposeInput) -> Result<Vec<InvoiceMessage>, MessagingError>;
    async fn inbox(&self, user: UserId) -> Result<Vec<InvoiceMessage>, MessagingError>;
    async fn outbox(&self, user: UserId) -> Result<Vec<InvoiceMessage>, MessagingError>;
}
