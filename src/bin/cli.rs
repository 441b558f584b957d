//! memcwire CLI Client
//!
//! Command-line interface for talking to a binary protocol server.

use clap::{Parser, Subcommand};
use memcwire::{Config, Response, TcpClient};
use tracing_subscriber::{fmt, EnvFilter};

/// memcwire CLI
#[derive(Parser, Debug)]
#[command(name = "memcwire-cli")]
#[command(about = "CLI for memcached binary protocol servers")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:11211")]
    server: String,

    /// VBucket id sent with key commands
    #[arg(long, default_value = "0")]
    vbucket: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        key: String,
        value: String,

        #[arg(long, default_value = "0")]
        flags: u32,

        /// Expiry in seconds (0 = never)
        #[arg(long, default_value = "0")]
        expiry: u32,
    },

    /// Store a key-value pair only if the key is new
    Add {
        key: String,
        value: String,

        #[arg(long, default_value = "0")]
        flags: u32,

        #[arg(long, default_value = "0")]
        expiry: u32,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Dump server statistics
    Stats {
        /// Stat group ("" for top-level)
        #[arg(default_value = "")]
        group: String,
    },
}

fn print_response(res: &Response) {
    if res.is_success() {
        println!("{} (cas={})", String::from_utf8_lossy(&res.body), res.cas);
    } else {
        println!("{}: {}", res.status, String::from_utf8_lossy(&res.body));
    }
}

fn run(args: Args) -> memcwire::Result<()> {
    let config = Config::default();
    let mut client = TcpClient::connect(&args.server, &config)?;
    let vb = args.vbucket;

    match args.command {
        Commands::Get { key } => print_response(&client.get(vb, &key)?),
        Commands::Set {
            key,
            value,
            flags,
            expiry,
        } => print_response(&client.set(vb, &key, flags, expiry, value.as_bytes())?),
        Commands::Add {
            key,
            value,
            flags,
            expiry,
        } => print_response(&client.add(vb, &key, flags, expiry, value.as_bytes())?),
        Commands::Del { key } => print_response(&client.delete(vb, &key)?),
        Commands::Stats { group } => {
            for stat in client.stats(&group)? {
                println!("{} = {}", stat.key, stat.value);
            }
        }
    }

    client.close()
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
