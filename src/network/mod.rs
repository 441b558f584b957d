//! Network Module
//!
//! TCP server and per-connection dispatch.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per connection, one request in flight each
//! - Requests handed to external handlers over a shared channel,
//!   answered through a one-shot responder per request

mod handoff;
mod connection;
mod server;

pub use handoff::{request_channel, PendingRequest, RequestReceiver, RequestSender, Responder};
pub use connection::Connection;
pub use server::{Server, ShutdownHandle};
