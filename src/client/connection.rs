//! Client request/response cycle
//!
//! A client owns one connection and keeps no state beyond it: every
//! response read is the next packet on the stream. Matching by opaque is
//! left to the caller.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{read_response, write_request, Request, Response};

/// A blocking memcached binary protocol client
pub struct Client<R, W> {
    /// Response side of the connection
    reader: R,

    /// Request side of the connection (flushed once per packet)
    writer: W,

    /// Largest value length accepted in a response
    max_body_len: u32,
}

/// Client over a buffered TCP connection
pub type TcpClient = Client<BufReader<TcpStream>, BufWriter<TcpStream>>;

impl TcpClient {
    /// Connect to a server
    ///
    /// Disables Nagle's algorithm and applies the configured timeouts.
    pub fn connect(addr: impl ToSocketAddrs, config: &Config) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        tracing::debug!("Connected to {:?}", stream.peer_addr().ok());

        let read_stream = stream.try_clone()?;
        Ok(Self::from_parts(
            BufReader::new(read_stream),
            BufWriter::new(stream),
            config,
        ))
    }

    /// Shut down both directions of the connection
    pub fn close(self) -> Result<()> {
        self.writer.get_ref().shutdown(Shutdown::Both)?;
        Ok(())
    }
}

impl<R: Read, W: Write> Client<R, W> {
    /// Build a client over any reader/writer pair
    pub fn from_parts(reader: R, writer: W, config: &Config) -> Self {
        Self {
            reader,
            writer,
            max_body_len: config.max_body_len,
        }
    }

    /// Send a request and wait for its response
    ///
    /// Do not interleave other sends on the same client between the write
    /// and the read; the next packet on the stream is taken as the answer.
    pub fn send(&mut self, req: &Request) -> Result<Response> {
        self.transmit(req)?;
        self.receive()
    }

    /// Write a request without waiting for a response
    pub fn transmit(&mut self, req: &Request) -> Result<()> {
        tracing::trace!(
            "-> {} key_len={} opaque={}",
            req.opcode,
            req.key.len(),
            req.opaque
        );
        write_request(&mut self.writer, req)
    }

    /// Read the next response on the connection
    ///
    /// Responses arrive in the order requests were transmitted.
    pub fn receive(&mut self) -> Result<Response> {
        let res = read_response(&mut self.reader, self.max_body_len)?;
        tracing::trace!(
            "<- {} status={} opaque={}",
            res.opcode,
            res.status,
            res.opaque
        );
        Ok(res)
    }

    /// Tear the client apart, returning the underlying streams
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
