mod event_publisher_impl;
mod event_sink_impl;
mod port;
mod server;

pub use event_publisher_impl::*;
pub use event_sink_impl::*;
pub use port::*;
pub use server::*;
