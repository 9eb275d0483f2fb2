use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default, Clone)]
pub(super) struct Tables {
    pub(super) connections: Vec<ConnectionEdge>,
    pub(super) requests: Vec<ConnectionRequest>,
    pub(super) follows: Vec<FollowEdge>,
    pub(super) blocks: Vec<BlockEdge>,
    pub(super) messages: Vec<InvoiceMessage>,
    pub(super) users: Vec<UserRecord>,
}

/// Process-local store backing every repository trait. Rows keep insertion
/// order, which doubles as creation order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) async fn lock(&self) -> OwnedMutexGuard<Tables> {
        self.tables.clone().lock_owned().await
    }

    /// Accounts are owned by the identity service; this seeds the local view.
    pub async fn insert_user(&self, user: UserRecord) {
        self.lock().await.users.push(user);
    }

    /// Writes an edge directly, bypassing the services.
    pub async fn seed_connection(&self, edge: ConnectionEdge) {
        self.lock().await.connections.push(edge);
    }

    pub async fn connection_rows(&self) -> Vec<ConnectionEdge> {
        self.lock().await.connections.clone()
    }

    pub async fn request_rows(&self) -> Vec<ConnectionRequest> {
        self.lock().await.requests.clone()
    }
}

#[async_trait::async_trait]
impl TxManager for MemoryStore {
    async fn begin<'t>(&'t self) -> Result<Box<dyn StorageTx<'t> + 't>, StoreError> {
        let guard = self.lock().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx { guard, staged }))
    }
}

/// Holds the table lock for its whole life and works on a staged copy.
pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

impl MemoryTx {
    pub(super) fn tables(&mut self) -> &mut Tables {
        &mut self.staged
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemoryTx {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(super) fn downcast<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> &'a mut MemoryTx {
    // SAFETY: MemoryStore is the only TxManager wired next to the memory
    // repositories, so every transaction handed to them is a MemoryTx.
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MemoryTx;
        &mut *p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn dropped_transaction_leaves_tables_untouched() {
        let store = MemoryStore::new();
        let (a, b) = (UserId::new_random(), UserId::new_random());

        {
            let mut tx = store.begin().await.unwrap();
            ConnectionRepo::insert_in_tx(&store, &mut *tx, &ConnectionEdge::new(a, b, Utc::now()))
                .await
                .unwrap();
        }
        assert!(store.connection_rows().await.is_empty());

        let mut tx = store.begin().await.unwrap();
        ConnectionRepo::insert_in_tx(&store, &mut *tx, &ConnectionEdge::new(a, b, Utc::now()))
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.connection_rows().await.len(), 1);
    }
}
