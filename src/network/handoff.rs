//! Request handoff
//!
//! The seam between wire I/O and application logic. A connection pushes a
//! `PendingRequest` onto the shared request channel and then waits on that
//! request's own single-slot reply channel.

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{McError, Result};
use crate::protocol::{Request, Response};

/// Sending half of the request channel, cloned into every connection
pub type RequestSender = Sender<PendingRequest>;

/// Receiving half of the request channel, consumed by handlers
pub type RequestReceiver = Receiver<PendingRequest>;

/// Create the request channel shared by all connections of a server
///
/// Zero capacity: a connection blocks until some handler takes its request.
pub fn request_channel() -> (RequestSender, RequestReceiver) {
    channel::bounded(0)
}

/// One-shot reply slot for a single request
///
/// `send` consumes the responder, so at most one response can be delivered.
/// Dropping it without sending makes the connection close.
#[derive(Debug)]
pub struct Responder {
    tx: Sender<Response>,
}

impl Responder {
    /// Create a responder and the receiver its connection waits on
    pub(crate) fn pair() -> (Self, Receiver<Response>) {
        let (tx, rx) = channel::bounded(1);
        (Self { tx }, rx)
    }

    /// Deliver the response
    ///
    /// Fails with `HandlerGone` if the connection stopped waiting.
    pub fn send(self, response: Response) -> Result<()> {
        self.tx.send(response).map_err(|_| McError::HandlerGone)
    }
}

/// A decoded request waiting for its handler
#[derive(Debug)]
pub struct PendingRequest {
    pub request: Request,
    responder: Responder,
}

impl PendingRequest {
    pub(crate) fn new(request: Request) -> (Self, Receiver<Response>) {
        let (responder, rx) = Responder::pair();
        (Self { request, responder }, rx)
    }

    /// Answer the request
    pub fn respond(self, response: Response) -> Result<()> {
        self.responder.send(response)
    }

    /// Close the connection instead of answering
    pub fn close_connection(self) -> Result<()> {
        self.responder.send(Response::fatal())
    }

    /// Split into the request and its responder, e.g. to answer from another thread
    pub fn into_parts(self) -> (Request, Responder) {
        (self.request, self.responder)
    }
}
