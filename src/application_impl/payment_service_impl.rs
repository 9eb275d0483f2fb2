use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub struct RealPaymentService {
    user_repo: Arc<dyn UserRepo>,
    messaging_service: Arc<dyn MessagingService>,
}

impl RealPaymentService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        messaging_service: Arc<dyn MessagingService>,
    ) -> Self {
        Self {
            user_repo,
            messaging_service,
        }
    }
}

#[async_trait::async_trait]
impl PaymentService for RealPaymentService {
    async fn resolve_recipient(
        &self,
        identifier: &str,
    ) -> Result<(UserRecord, RecipientMatch), PaymentError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(PaymentError::RecipientNotFound(identifier.to_owned()));
        }

        let found = self.user_repo.find_by_web_id(identifier).await?;
        if let Some(user) = found.filter(|u| u.is_active) {
            return Ok((user, RecipientMatch::WebId));
        }
        let found = self.user_repo.find_by_peppol_id(identifier).await?;
        if let Some(user) = found.filter(|u| u.is_active) {
            return Ok((user, RecipientMatch::PeppolId));
        }
        let found = self.user_repo.find_by_username(identifier).await?;
        if let Some(user) = found.filter(|u| u.is_active) {
            return Ok((user, RecipientMatch::Username));
        }

        Err(PaymentError::RecipientNotFound(identifier.to_owned()))
    }

    async fn pay(
        &self,
        sender: UserId,
        request: PaymentRequest,
    ) -> Result<PaymentReceipt, PaymentError> {
        let (recipient, matched_by) = self.resolve_recipient(&request.recipient).await?;
        tracing::debug!(
            identifier = %request.recipient,
            recipient = %recipient.user_id,
            ?matched_by,
            "payment recipient resolved"
        );

        let messages = self
            .messaging_service
            .compose(ComposeInput {
                sender,
                recipient: recipient.user_id,
                document: request.document,
                parent_msg: None,
            })
            .await?;

        Ok(PaymentReceipt {
            recipient: recipient.user_id,
            matched_by,
            contact_email: request.email,
            messages,
        })
    }
}
