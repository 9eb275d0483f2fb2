// cache and events

mod event_sink;
mod relation_cache;

pub use event_sink::*;
pub use relation_cache::*;

// repo

mod block_repo;
mod connection_repo;
mod connection_request_repo;
mod follow_repo;
mod message_repo;
mod user_repo;

pub use block_repo::*;
pub use connection_repo::*;
pub use connection_request_repo::*;
pub use follow_repo::*;
pub use message_repo::*;
pub use user_repo::*;

mod repo_tx;
mod store_error;

pub use repo_tx::*;
pub use store_error::*;
