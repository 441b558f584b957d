//! Command builders
//!
//! Thin field population over `Client::send`, plus the multi-packet STAT
//! exchange.

use std::collections::HashMap;
use std::io::{Read, Write};

use bytes::BufMut;

use super::Client;
use crate::error::Result;
use crate::protocol::{Opcode, Request, Response};

/// Opaque sent with every STAT request
pub const STATS_OPAQUE: u32 = 918494;

/// One entry of a STAT reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatValue {
    pub key: String,
    pub value: String,
}

/// Pack flags and expiry into the 8-byte extras of SET/ADD
pub fn store_extras(flags: u32, expiry: u32) -> [u8; 8] {
    let mut extras = [0u8; 8];
    let mut out = &mut extras[..];
    out.put_u32(flags);
    out.put_u32(expiry);
    extras
}

impl<R: Read, W: Write> Client<R, W> {
    /// Get the value for a key
    pub fn get(&mut self, vbucket: u16, key: &str) -> Result<Response> {
        let req = Request::new(Opcode::GET)
            .with_vbucket(vbucket)
            .with_key(key.as_bytes());
        self.send(&req)
    }

    /// Delete a key
    pub fn delete(&mut self, vbucket: u16, key: &str) -> Result<Response> {
        let req = Request::new(Opcode::DELETE)
            .with_vbucket(vbucket)
            .with_key(key.as_bytes());
        self.send(&req)
    }

    /// Store a value only if the key does not exist yet
    pub fn add(
        &mut self,
        vbucket: u16,
        key: &str,
        flags: u32,
        expiry: u32,
        body: &[u8],
    ) -> Result<Response> {
        self.store(Opcode::ADD, vbucket, key, flags, expiry, body)
    }

    /// Store a value unconditionally
    pub fn set(
        &mut self,
        vbucket: u16,
        key: &str,
        flags: u32,
        expiry: u32,
        body: &[u8],
    ) -> Result<Response> {
        self.store(Opcode::SET, vbucket, key, flags, expiry, body)
    }

    fn store(
        &mut self,
        opcode: Opcode,
        vbucket: u16,
        key: &str,
        flags: u32,
        expiry: u32,
        body: &[u8],
    ) -> Result<Response> {
        let req = Request::new(opcode)
            .with_vbucket(vbucket)
            .with_key(key.as_bytes())
            .with_extras(store_extras(flags, expiry))
            .with_body(body);
        self.send(&req)
    }

    /// Fetch server statistics; use "" for the top-level group
    ///
    /// The server answers with one packet per stat and ends the sequence
    /// with a packet whose key is empty. The terminator is not returned.
    /// There is no bound on the number of packets read.
    pub fn stats(&mut self, key: &str) -> Result<Vec<StatValue>> {
        let req = Request::new(Opcode::STAT)
            .with_opaque(STATS_OPAQUE)
            .with_key(key.as_bytes());
        self.transmit(&req)?;

        let mut stats = Vec::new();
        loop {
            let res = self.receive()?;
            if res.key.is_empty() {
                break;
            }
            stats.push(StatValue {
                key: String::from_utf8_lossy(&res.key).into_owned(),
                value: String::from_utf8_lossy(&res.body).into_owned(),
            });
        }

        tracing::debug!("Received {} stats for group {:?}", stats.len(), key);
        Ok(stats)
    }

    /// Fetch server statistics as a map
    pub fn stats_map(&mut self, key: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .stats(key)?
            .into_iter()
            .map(|stat| (stat.key, stat.value))
            .collect())
    }
}
