//! TCP Server
//!
//! Accepts connections and runs each one on its own thread.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::connection::Connection;
use super::handoff::RequestSender;
use crate::config::Config;
use crate::error::Result;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Stops a running server's accept loop
#[derive(Debug, Clone)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Signal the server to stop accepting connections
    pub fn shutdown(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Decrements the active connection count when a connection thread ends
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// TCP server for the binary protocol
///
/// Decoded requests from every connection go to the same request channel.
pub struct Server {
    config: Config,
    listener: TcpListener,
    requests: RequestSender,
    shutdown: ShutdownHandle,
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Bind the configured listen address
    pub fn bind(config: Config, requests: RequestSender) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking so the accept loop can observe shutdown
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            listener,
            requests,
            shutdown: ShutdownHandle(Arc::new(AtomicBool::new(false))),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that can stop `run` from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Signal the server to shutdown
    ///
    /// Open connections keep running until their client or handler ends them.
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Accept connections until shutdown (blocking)
    pub fn run(&self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);

        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, addr)) => self.spawn_connection(stream, addr),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::error!("Accept failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        tracing::info!("Stopped accepting connections");
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, addr: SocketAddr) {
        if self.active.load(Ordering::Acquire) >= self.config.max_connections {
            tracing::warn!(
                "Rejecting {}: connection limit {} reached",
                addr,
                self.config.max_connections
            );
            return;
        }

        if let Err(e) = stream.set_nonblocking(false) {
            tracing::warn!("Failed to configure stream from {}: {}", addr, e);
            return;
        }

        self.active.fetch_add(1, Ordering::AcqRel);
        let guard = ActiveGuard(Arc::clone(&self.active));
        let requests = self.requests.clone();
        let config = self.config.clone();

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", addr))
            .spawn(move || {
                let _guard = guard;
                match Connection::new(stream, requests, &config) {
                    // Errors are logged inside handle; the stream closes on drop
                    Ok(mut conn) => {
                        let _ = conn.handle();
                    }
                    Err(e) => tracing::warn!("Failed to set up connection from {}: {}", addr, e),
                }
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn connection thread for {}: {}", addr, e);
        }
    }
}
