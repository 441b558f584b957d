//! Client Module
//!
//! Blocking client for the binary protocol.
//!
//! ## Usage
//! - `send`: write one request, read one response
//! - `transmit` / `receive`: the same two steps, for manual pipelining
//! - `stats`: one request, many responses, ended by an empty key

mod connection;
mod commands;

pub use connection::{Client, TcpClient};
pub use commands::{store_extras, StatValue, STATS_OPAQUE};
