use crate::domain_model::*;
use crate::domain_port::{InsertOutcome, StorageTx, StoreError};

#[async_trait::async_trait]
pub trait ConnectionRepo: Send + Sync {
    /// Insert one direction. The caller inserts the reverse edge in the same
    /// transaction.
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        edge: &ConnectionEdge,
    ) -> Result<InsertOutcome, StoreError>;

    /// `from_user` of every edge whose `to_user` is `user`, oldest first.
    async fn list_connections(&self, user: UserId) -> Result<Vec<UserId>, StoreError>;

    /// `to_user` of every edge leaving `user` with the given flag set.
    async fn list_partners(
        &self,
        user: UserId,
        role: PartnerRole,
    ) -> Result<Vec<UserId>, StoreError>;

    async fn exists(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError>;

    /// Returns `false` when the edge does not exist.
    async fn set_partner_flag(
        &self,
        from_user: UserId,
        to_user: UserId,
        role: PartnerRole,
        value: bool,
    ) -> Result<bool, StoreError>;

    /// Deletes both directions, returns the number of rows removed.
    async fn delete_between(&self, a: UserId, b: UserId) -> Result<u64, StoreError>;
}
