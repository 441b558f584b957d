//! Packet definitions
//!
//! `Request` and `Response` own their extras/key/body buffers. The header
//! field at bytes 6-7 is a vbucket id on a request and a status on a
//! response, so each side gets its own named field.

use super::{Opcode, Status};

/// A request packet (magic 0x80)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub opcode: Opcode,

    /// Partition identifier, opaque to this layer
    pub vbucket: u16,

    /// Correlation token echoed back in the response
    pub opaque: u32,

    pub cas: u64,
    pub extras: Vec<u8>,
    pub key: Vec<u8>,
    pub body: Vec<u8>,
}

impl Request {
    /// Create an empty request for `opcode`
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            vbucket: 0,
            opaque: 0,
            cas: 0,
            extras: Vec::new(),
            key: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_vbucket(mut self, vbucket: u16) -> Self {
        self.vbucket = vbucket;
        self
    }

    pub fn with_opaque(mut self, opaque: u32) -> Self {
        self.opaque = opaque;
        self
    }

    pub fn with_cas(mut self, cas: u64) -> Self {
        self.cas = cas;
        self
    }

    pub fn with_extras(mut self, extras: impl Into<Vec<u8>>) -> Self {
        self.extras = extras.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Combined length of extras, key and body
    pub fn body_len(&self) -> usize {
        self.extras.len() + self.key.len() + self.body.len()
    }
}

/// A response packet (magic 0x81)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Opcode of the request this answers; the server overwrites it on send
    pub opcode: Opcode,

    pub status: Status,

    /// Echo of the request's opaque; the server overwrites it on send
    pub opaque: u32,

    pub cas: u64,
    pub extras: Vec<u8>,
    pub key: Vec<u8>,
    pub body: Vec<u8>,

    /// Never written to the wire. When set, the server closes the
    /// connection instead of sending this response.
    pub fatal: bool,
}

impl Response {
    /// Create an empty response with the given status
    pub fn new(status: Status) -> Self {
        Self {
            opcode: Opcode::GET,
            status,
            opaque: 0,
            cas: 0,
            extras: Vec::new(),
            key: Vec::new(),
            body: Vec::new(),
            fatal: false,
        }
    }

    /// Create an empty SUCCESS response
    pub fn success() -> Self {
        Self::new(Status::SUCCESS)
    }

    /// Create a response that tells the server to drop the connection
    pub fn fatal() -> Self {
        Self {
            fatal: true,
            ..Self::new(Status::SUCCESS)
        }
    }

    pub fn with_opcode(mut self, opcode: Opcode) -> Self {
        self.opcode = opcode;
        self
    }

    pub fn with_opaque(mut self, opaque: u32) -> Self {
        self.opaque = opaque;
        self
    }

    pub fn with_cas(mut self, cas: u64) -> Self {
        self.cas = cas;
        self
    }

    pub fn with_extras(mut self, extras: impl Into<Vec<u8>>) -> Self {
        self.extras = extras.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Combined length of extras, key and body
    pub fn body_len(&self) -> usize {
        self.extras.len() + self.key.len() + self.body.len()
    }
}
