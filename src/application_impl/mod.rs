mod block_service_impl;
mod cache_facade;
mod connection_service_impl;
mod follow_service_impl;
mod messaging_service_impl;
mod payment_service_impl;
mod session_verifier_fake;
mod session_verifier_jwt;

pub use block_service_impl::*;
pub use cache_facade::*;
pub use connection_service_impl::*;
pub use follow_service_impl::*;
pub use messaging_service_impl::*;
pub use payment_service_impl::*;
pub use session_verifier_fake::*;
pub use session_verifier_jwt::*;
