use crate::application_port::RelationError;
use crate::domain_model::*;

/// Connections between users plus the request workflow that creates them.
#[async_trait::async_trait]
pub trait ConnectionService: Send + Sync {
    async fn connections(&self, user: UserId) -> Result<Vec<UserId>, RelationError>;
    async fn suppliers(&self, user: UserId) -> Result<Vec<UserId>, RelationError>;
    async fn costumers(&self, user: UserId) -> Result<Vec<UserId>, RelationError>;
    async fn are_connections(&self, a: UserId, b: UserId) -> Result<bool, RelationError>;
    async fn remove_connection(&self, from_user: UserId, to_user: UserId)
    -> Result<bool, RelationError>;
    async fn set_partner(
        &self,
        from_user: UserId,
        to_user: UserId,
        role: PartnerRole,
    ) -> Result<bool, RelationError>;
    async fn remove_partner(
        &self,
        from_user: UserId,
        to_user: UserId,
        role: PartnerRole,
    ) -> Result<bool, RelationError>;

    async fn requests(&self, user: UserId) -> Result<Vec<ConnectionRequest>, RelationError>;
    async fn sent_requests(&self, user: UserId) -> Result<Vec<ConnectionRequest>, RelationError>;
    async fn unread_requests(&self, user: UserId)
    -> Result<Vec<ConnectionRequest>, RelationError>;
    async fn unread_request_count(&self, user: UserId) -> Result<u64, RelationError>;
    async fn read_requests(&self, user: UserId) -> Result<Vec<ConnectionRequest>, RelationError>;
    async fn rejected_requests(
        &self,
        user: UserId,
    ) -> Result<Vec<ConnectionRequest>, RelationError>;
    async fn unrejected_requests(
        &self,
        user: UserId,
    ) -> Result<Vec<ConnectionRequest>, RelationError>;
    async fn unrejected_request_count(&self, user: UserId) -> Result<u64, RelationError>;

    async fn add_connection(
        &self,
        from_user: UserId,
        to_user: UserId,
        message: Option<&str>,
    ) -> Result<ConnectionRequest, RelationError>;
    async fn accept_request(&self, from_user: UserId, to_user: UserId)
    -> Result<(), RelationError>;
    async fn reject_request(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<ConnectionRequest, RelationError>;
    async fn cancel_request(&self, from_user: UserId, to_user: UserId)
    -> Result<(), RelationError>;
    async fn mark_request_viewed(
        &self,
        from_user: UserId,
        to_user: UserId,
    ) -> Result<ConnectionRequest, RelationError>;
}
