use super::util::downcast;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

pub struct MySqlMessageRepo {
    pool: MySqlPool,
}

const MESSAGE_COLUMNS: &str = "message_id, sender, recipient, subject, body, xml_type, xml, \
                               peppol_classic, parent_msg, sent_at, replied_at";

impl MySqlMessageRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlMessageRepo { pool }
    }

    fn row_to_message(r: &MySqlRow) -> Result<InvoiceMessage, StoreError> {
        let decode = |e: sqlx::Error| StoreError::backend("decode invoice message", e);
        Ok(InvoiceMessage {
            message_id: r.try_get("message_id").map_err(decode)?,
            sender: r.try_get("sender").map_err(decode)?,
            recipient: r.try_get("recipient").map_err(decode)?,
            subject: r.try_get("subject").map_err(decode)?,
            body: r.try_get("body").map_err(decode)?,
            document: InvoiceDocument {
                xml_type: r.try_get("xml_type").map_err(decode)?,
                xml: r.try_get("xml").map_err(decode)?,
                peppol_classic: r.try_get("peppol_classic").map_err(decode)?,
            },
            parent_msg: r.try_get("parent_msg").map_err(decode)?,
            sent_at: r.try_get("sent_at").map_err(decode)?,
            replied_at: r.try_get("replied_at").map_err(decode)?,
        })
    }

    async fn list_where(&self, column: &str, user: UserId) -> Result<Vec<InvoiceMessage>, StoreError> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM invoice_message WHERE {column} = ? \
             ORDER BY sent_at DESC, message_id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend("list invoice messages", e))?;

        rows.iter().map(Self::row_to_message).collect()
    }
}

#[async_trait::async_trait]
impl MessageRepo for MySqlMessageRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        message: &InvoiceMessage,
    ) -> Result<(), StoreError> {
        let tx = downcast(tx);

        sqlx::query(
            r#"
INSERT INTO invoice_message
    (message_id, sender, recipient, subject, body, xml_type, xml,
     peppol_classic, parent_msg, sent_at, replied_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(message.message_id)
        .bind(message.sender)
        .bind(message.recipient)
        .bind(&message.subject)
        .bind(&message.body)
        .bind(&message.document.xml_type)
        .bind(&message.document.xml)
        .bind(message.document.peppol_classic)
        .bind(message.parent_msg)
        .bind(message.sent_at)
        .bind(message.replied_at)
        .execute(tx.conn())
        .await
        .map_err(|e| StoreError::backend("insert invoice message", e))?;

        Ok(())
    }

    async fn mark_replied_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        message_id: MessageId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let tx = downcast(tx);

        // the row lock also stops the parent from vanishing before the insert
        let found = sqlx::query("SELECT 1 FROM invoice_message WHERE message_id = ? FOR UPDATE")
            .bind(message_id)
            .fetch_optional(tx.conn())
            .await
            .map_err(|e| StoreError::backend("lock parent message", e))?;
        if found.is_none() {
            return Ok(false);
        }

        sqlx::query("UPDATE invoice_message SET replied_at = ? WHERE message_id = ?")
            .bind(at)
            .bind(message_id)
            .execute(tx.conn())
            .await
            .map_err(|e| StoreError::backend("mark message replied", e))?;
        Ok(true)
    }

    async fn get(&self, message_id: MessageId) -> Result<Option<InvoiceMessage>, StoreError> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM invoice_message WHERE message_id = ?");
        let row = sqlx::query(&sql)
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::backend("get invoice message", e))?;

        row.as_ref().map(Self::row_to_message).transpose()
    }

    async fn list_received(&self, user: UserId) -> Result<Vec<InvoiceMessage>, StoreError> {
        self.list_where("recipient", user).await
    }

    async fn list_sent(&self, user: UserId) -> Result<Vec<InvoiceMessage>, StoreError> {
        self.list_where("sender", user).await
    }
}
