use crate::application_port::*;
use crate::domain_model::UserId;

/// Accepts `fake-access-token:<name>` and maps the name to a stable id.
/// Lets a dev server run without the identity service.
#[derive(Debug, Default)]
pub struct FakeSessionVerifier;

impl FakeSessionVerifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SessionVerifier for FakeSessionVerifier {
    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        match token.strip_prefix("fake-access-token:") {
            Some(name) if !name.is_empty() => Ok(fake_user_id(name)),
            _ => Err(AuthError::TokenInvalid),
        }
    }
}

pub fn fake_user_id(name: &str) -> UserId {
    UserId(uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, name.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_name_maps_to_same_user() {
        let verifier = FakeSessionVerifier::new();

        let a = verifier.verify_token("fake-access-token:alice").await.unwrap();
        assert_eq!(a, fake_user_id("alice"));
        assert_ne!(a, fake_user_id("bob"));
        assert!(matches!(
            verifier.verify_token("Bearer alice").await,
            Err(AuthError::TokenInvalid)
        ));
    }
}
