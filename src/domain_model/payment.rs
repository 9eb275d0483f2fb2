use crate::domain_model::{InvoiceDocument, InvoiceMessage, UserId};
use serde::{Deserialize, Serialize};

/// Checkout submitted from the webshop or the procurement page.
///
/// `recipient` is whatever the buyer typed: a webID, a PEPPOL participant id
/// or a username.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub email: String,
    pub recipient: String,
    pub document: InvoiceDocument,
}

/// Which lookup matched the entered identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientMatch {
    WebId,
    PeppolId,
    Username,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub recipient: UserId,
    pub matched_by: RecipientMatch,
    pub contact_email: String,
    pub messages: Vec<InvoiceMessage>,
}
