mod block_repo_mysql;
mod connection_repo_mysql;
mod connection_request_repo_mysql;
mod follow_repo_mysql;
mod message_repo_mysql;
mod user_repo_mysql;

pub use block_repo_mysql::*;
pub use connection_repo_mysql::*;
pub use connection_request_repo_mysql::*;
pub use follow_repo_mysql::*;
pub use message_repo_mysql::*;
pub use user_repo_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod util;
