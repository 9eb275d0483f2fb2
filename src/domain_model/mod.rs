mod cache_key;
mod event;
mod message;
mod payment;
mod relation;
mod request;
mod user;

pub use cache_key::*;
pub use event::*;
pub use message::*;
pub use payment::*;
pub use relation::*;
pub use request::*;
pub use user::*;
