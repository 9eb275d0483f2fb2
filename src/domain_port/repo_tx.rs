use crate::domain_port::StoreError;

/// Opens a unit of work on the relational store.
///
/// Every `*_in_tx` repository call made with the same transaction becomes
/// visible together on `commit`, or not at all.
#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    async fn begin<'t>(&'t self) -> Result<Box<dyn StorageTx<'t> + 't>, StoreError>;
}

/// Dropping a transaction without committing rolls it back.
#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
