//! # memcwire
//!
//! The memcached binary protocol, framed over blocking byte streams:
//! - Fixed 24-byte header codec with magic validation
//! - Exact-length frame reading with a configurable body limit
//! - Client request/response cycle, including the multi-packet STAT reply
//! - Per-connection server dispatcher handing requests to external handlers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐                              ┌──────────────────────┐
//! │    Client    │── write_request ───────────▶ │  Connection (thread) │
//! │ send/receive │                              │   read_request       │
//! │    stats     │◀─────────── write_response ──│   write_response     │
//! └──────────────┘                              └──────────┬───────────┘
//!                                                          │ PendingRequest
//!                                                          ▼
//!                                               ┌──────────────────────┐
//!                                               │  Handlers (external) │
//!                                               │  respond() once      │
//!                                               └──────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod client;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{McError, Result};
pub use config::Config;
pub use client::{Client, TcpClient};
pub use network::{Connection, PendingRequest, Server};
pub use protocol::{Opcode, Request, Response, Status};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of memcwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
