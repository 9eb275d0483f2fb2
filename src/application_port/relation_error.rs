use crate::domain_port::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for RelationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Backend(e) => RelationError::Store(e),
        }
    }
}
