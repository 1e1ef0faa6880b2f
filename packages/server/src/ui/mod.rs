//! Server-facing layer: dispatcher, relay runtime and the network gateway.

pub mod dispatcher;
mod handler;
pub mod relay;
mod server;
mod signal;
pub mod state;

pub use dispatcher::Dispatcher;
pub use relay::{Relay, RelayError, RelayHandle};
pub use server::{Server, ServerError};
pub use signal::shutdown_signal;
