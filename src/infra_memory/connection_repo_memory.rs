use super::memory_store::{MemoryStore, downcast};
use crate::domain_model::*;
use crate::domain_port::*;

#[async_trait::async_trait]
impl ConnectionRepo for MemoryStore {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        edge: &ConnectionEdge,
    ) -> Result<InsertOutcome, StoreError> {
        let tables = downcast(tx).tables();

        if tables
            .connections
            .iter()
            .any(|c| c.from_user == edge.from_user && c.to_user == edge.to_user)
        {
            return Ok(InsertOutcome::Duplicate);
        }
        tables.connections.push(edge.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn list_connections(&self, user: UserId) -> Result<Vec<UserId>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .connections
            .iter()
            .filter(|c| c.to_user == user)
            .map(|c| c.from_user)
            .collect())
    }

    async fn list_partners(
        &self,
        user: UserId,
        role: PartnerRole,
    ) -> Result<Vec<UserId>, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .connections
            .iter()
            .filter(|c| c.from_user == user)
            .filter(|c| match role {
                PartnerRole::Supplier => c.is_supplier,
                PartnerRole::Costumer => c.is_costumer,
            })
            .map(|c| c.to_user)
            .collect())
    }

    async fn exists(&self, from_user: UserId, to_user: UserId) -> Result<bool, StoreError> {
        let tables = self.lock().await;
        Ok(tables
            .connections
            .iter()
            .any(|c| c.from_user == from_user && c.to_user == to_user))
    }

    async fn set_partner_flag(
        &self,
        from_user: UserId,
        to_user: UserId,
        role: PartnerRole,
        value: bool,
    ) -> Result<bool, StoreError> {
        let mut tables = self.lock().await;
        let Some(edge) = tables
            .connections
            .iter_mut()
            .find(|c| c.from_user == from_user && c.to_user == to_user)
        else {
            return Ok(false);
        };
        match role {
            PartnerRole::Supplier => edge.is_supplier = value,
            PartnerRole::Costumer => edge.is_costumer = value,
        }
        Ok(true)
    }

    async fn delete_between(&self, a: UserId, b: UserId) -> Result<u64, StoreError> {
        let mut tables = self.lock().await;
        let before = tables.connections.len();
        tables.connections.retain(|c| {
            !((c.from_user == a && c.to_user == b) || (c.from_user == b && c.to_user == a))
        });
        Ok((before - tables.connections.len()) as u64)
    }
}
