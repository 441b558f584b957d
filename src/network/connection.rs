//! Connection Dispatcher
//!
//! Runs one client connection: read a request, hand it off, wait for the
//! handler's response, write it, repeat. Exactly one request is in flight
//! per connection; the next packet is not read until the current response
//! has been written and flushed.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crossbeam::channel::Receiver;

use super::handoff::{PendingRequest, RequestSender};
use crate::config::Config;
use crate::error::{McError, Result};
use crate::protocol::{read_request, write_response, Opcode, Request, Response};

/// Fields copied from the request onto its response
#[derive(Debug, Clone, Copy)]
struct Echo {
    opcode: Opcode,
    opaque: u32,
}

impl Echo {
    fn of(req: &Request) -> Self {
        Self {
            opcode: req.opcode,
            opaque: req.opaque,
        }
    }
}

/// Dispatcher states
enum State {
    ReadingPacket,
    AwaitingResponse { echo: Echo, reply: Receiver<Response> },
    WritingResponse { echo: Echo, response: Response },
    Closed,
}

/// Handles a single client connection
pub struct Connection<R, W> {
    /// Request side of the stream
    reader: R,

    /// Response side of the stream (flushed once per packet)
    writer: W,

    /// Where decoded requests are handed to the application
    requests: RequestSender,

    /// Largest value length accepted in a request
    max_body_len: u32,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<BufReader<TcpStream>, BufWriter<TcpStream>> {
    /// Create a connection handler for an accepted TCP stream
    ///
    /// Sets up buffered I/O and configures timeouts.
    pub fn new(stream: TcpStream, requests: RequestSender, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let read_stream = stream.try_clone()?;
        Ok(Self::from_parts(
            BufReader::new(read_stream),
            BufWriter::new(stream),
            requests,
            config,
            peer_addr,
        ))
    }
}

impl<R: Read, W: Write> Connection<R, W> {
    /// Create a connection handler over any reader/writer pair
    pub fn from_parts(
        reader: R,
        writer: W,
        requests: RequestSender,
        config: &Config,
        peer_addr: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            writer,
            requests,
            max_body_len: config.max_body_len,
            peer_addr: peer_addr.into(),
        }
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Returns `Ok(())` when the client disconnects between packets. Every
    /// other way out is an error: framing and transport failures, a handler
    /// that asked for the connection to close, or a handler that went away.
    /// No response is written in any of those cases; dropping the
    /// connection closes the stream.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let result = self.dispatch();
        match &result {
            Ok(()) => tracing::debug!("Client {} disconnected", self.peer_addr),
            Err(McError::HandlerFatal) => {
                tracing::debug!("Handler closed connection to {}", self.peer_addr)
            }
            Err(e) if e.is_disconnect() => {
                tracing::debug!("Client {} went away: {}", self.peer_addr, e)
            }
            Err(e) => tracing::warn!("Closing connection to {}: {}", self.peer_addr, e),
        }
        result
    }

    fn dispatch(&mut self) -> Result<()> {
        let mut state = State::ReadingPacket;
        loop {
            state = match state {
                State::ReadingPacket => match read_request(&mut self.reader, self.max_body_len) {
                    Ok(req) => self.hand_off(req)?,
                    Err(McError::ConnectionClosed) => State::Closed,
                    Err(e) => return Err(e),
                },
                State::AwaitingResponse { echo, reply } => {
                    // A dropped responder disconnects the channel
                    let response = reply.recv().map_err(|_| McError::HandlerGone)?;
                    State::WritingResponse { echo, response }
                }
                State::WritingResponse { echo, response } => {
                    if response.fatal {
                        return Err(McError::HandlerFatal);
                    }
                    self.send_response(echo, response)?;
                    State::ReadingPacket
                }
                State::Closed => return Ok(()),
            };
        }
    }

    /// Push the request to the handlers and move to waiting on its reply
    fn hand_off(&self, req: Request) -> Result<State> {
        tracing::trace!(
            "Received {} from {} (key_len={}, opaque={})",
            req.opcode,
            self.peer_addr,
            req.key.len(),
            req.opaque
        );

        let echo = Echo::of(&req);
        let (pending, reply) = PendingRequest::new(req);
        self.requests
            .send(pending)
            .map_err(|_| McError::HandlerGone)?;
        Ok(State::AwaitingResponse { echo, reply })
    }

    fn send_response(&mut self, echo: Echo, mut response: Response) -> Result<()> {
        response.opcode = echo.opcode;
        response.opaque = echo.opaque;
        write_response(&mut self.writer, &response)?;
        tracing::trace!(
            "Sent {} status={} to {}",
            response.opcode,
            response.status,
            self.peer_addr
        );
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Tear the connection apart, returning the underlying streams
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
