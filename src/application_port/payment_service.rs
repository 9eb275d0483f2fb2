use crate::application_port::MessagingError;
use crate::domain_model::*;
use crate::domain_port::{StoreError, UserRecord};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("no registered recipient matches {0:?}")]
    RecipientNotFound(String),
    #[error("messaging error: {0}")]
    Messaging(#[from] MessagingError),
    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for PaymentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Backend(e) => PaymentError::Store(e),
        }
    }
}

#[async_trait::async_trait]
pub trait PaymentService: Send + Sync {
    async fn resolve_recipient(
        &self,
        identifier: &str,
    ) -> Result<(UserRecord, RecipientMatch), PaymentError>;
    async fn pay(
        &self,
        sender: UserId,
        request: PaymentRequest,
    ) -> Result<PaymentReceipt, PaymentError>;
}
