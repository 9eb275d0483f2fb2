mod auth_service;
mod block_service;
mod connection_service;
mod follow_service;
mod messaging_service;
mod payment_service;
mod relation_error;

pub use auth_service::*;
pub use block_service::*;
pub use connection_service::*;
pub use follow_service::*;
pub use messaging_service::*;
pub use payment_service::*;
pub use relation_error::*;
