//! memcwire Server Binary
//!
//! Runs the protocol server with a small in-memory cache as the request
//! handler. The cache lives here, outside the library: the library only
//! frames packets and hands them over.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use memcwire::network::{request_channel, RequestReceiver, Server};
use memcwire::{Config, Opcode, Request, Response, Status};
use parking_lot::RwLock;
use tracing_subscriber::{fmt, EnvFilter};

/// memcwire Server
#[derive(Parser, Debug)]
#[command(name = "memcwire-server")]
#[command(about = "Memcached binary protocol server backed by an in-memory map")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:11211")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Largest accepted value in bytes
    #[arg(short = 'b', long, default_value = "1000000")]
    max_body_len: u32,

    /// Number of handler threads
    #[arg(short, long, default_value = "4")]
    workers: usize,
}

#[derive(Debug, Clone)]
struct Item {
    flags: u32,
    cas: u64,
    value: Vec<u8>,
}

/// The demo cache behind the request channel
#[derive(Default)]
struct Cache {
    items: RwLock<HashMap<Vec<u8>, Item>>,
    next_cas: AtomicU64,
}

impl Cache {
    fn handle(&self, req: &Request) -> Response {
        match req.opcode {
            Opcode::GET | Opcode::GETK => self.get(req),
            Opcode::SET | Opcode::ADD | Opcode::REPLACE => self.store(req),
            Opcode::DELETE => self.delete(req),
            Opcode::FLUSH => {
                self.items.write().clear();
                Response::success()
            }
            Opcode::NOOP | Opcode::QUIT => Response::success(),
            Opcode::VERSION => Response::success().with_body(memcwire::VERSION),
            // Single-response STAT: the empty-key terminator alone
            Opcode::STAT => Response::success(),
            _ => Response::new(Status::UNKNOWN_COMMAND).with_body("Unknown command"),
        }
    }

    fn get(&self, req: &Request) -> Response {
        let items = self.items.read();
        match items.get(&req.key) {
            Some(item) => {
                let res = Response::success()
                    .with_cas(item.cas)
                    .with_extras(item.flags.to_be_bytes())
                    .with_body(item.value.clone());
                if req.opcode == Opcode::GETK {
                    res.with_key(req.key.clone())
                } else {
                    res
                }
            }
            None => Response::new(Status::KEY_ENOENT).with_body("Not found"),
        }
    }

    fn store(&self, req: &Request) -> Response {
        if req.extras.len() != 8 {
            return Response::new(Status::EINVAL).with_body("Invalid arguments");
        }
        let flags = u32::from_be_bytes([req.extras[0], req.extras[1], req.extras[2], req.extras[3]]);

        let mut items = self.items.write();
        let existing = items.get(&req.key);
        let status = match (req.opcode, existing) {
            (Opcode::ADD, Some(_)) => Status::KEY_EEXISTS,
            (Opcode::REPLACE, None) => Status::KEY_ENOENT,
            (_, Some(item)) if req.cas != 0 && item.cas != req.cas => Status::KEY_EEXISTS,
            (_, None) if req.cas != 0 => Status::KEY_ENOENT,
            _ => Status::SUCCESS,
        };
        if !status.is_success() {
            return Response::new(status);
        }

        let cas = self.next_cas.fetch_add(1, Ordering::Relaxed) + 1;
        items.insert(
            req.key.clone(),
            Item {
                flags,
                cas,
                value: req.body.clone(),
            },
        );
        Response::success().with_cas(cas)
    }

    fn delete(&self, req: &Request) -> Response {
        match self.items.write().remove(&req.key) {
            Some(_) => Response::success(),
            None => Response::new(Status::KEY_ENOENT).with_body("Not found"),
        }
    }
}

fn spawn_workers(count: usize, requests: RequestReceiver, cache: Arc<Cache>) {
    for id in 0..count {
        let requests = requests.clone();
        let cache = Arc::clone(&cache);
        let spawned = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || {
                for pending in requests.iter() {
                    let response = cache.handle(&pending.request);
                    if pending.respond(response).is_err() {
                        tracing::debug!("Connection gone before response was delivered");
                    }
                }
            });
        if let Err(e) = spawned {
            tracing::error!("Failed to spawn worker {}: {}", id, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,memcwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("memcwire Server v{}", memcwire::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!("Max body length: {}", args.max_body_len);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .max_body_len(args.max_body_len)
        .build();

    let (tx, rx) = request_channel();
    spawn_workers(args.workers.max(1), rx, Arc::new(Cache::default()));

    let server = match Server::bind(config, tx) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
