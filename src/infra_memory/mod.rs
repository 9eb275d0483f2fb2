mod block_repo_memory;
mod connection_repo_memory;
mod connection_request_repo_memory;
mod follow_repo_memory;
mod message_repo_memory;
mod user_repo_memory;

mod memory_store;

pub use memory_store::*;

mod event_sink_memory;
mod relation_cache_memory;

pub use event_sink_memory::*;
pub use relation_cache_memory::*;
