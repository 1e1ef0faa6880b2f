//! Multi-room chat relay server.
//!
//! Starts the relay core over in-process mailboxes and exposes them to remote
//! clients through a WebSocket gateway.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatrelay-server
//! cargo run --bin chatrelay-server -- --host 0.0.0.0 --port 3000 --workers 8
//! ```

use std::{sync::Arc, time::Duration};

use chatrelay_server::{
    config::{
        DEFAULT_HEARTBEAT_TIMEOUT, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_SWEEP_INTERVAL,
        DEFAULT_WORKER_COUNT, OverflowPolicy, RelayConfig,
    },
    infrastructure::transport::InMemoryMailboxTransport,
    ui::{Relay, Server},
};
use chatrelay_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chatrelay-server")]
#[command(about = "Multi-room chat relay with heartbeat-based liveness", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds of silence after which a client is reclaimed
    #[arg(long, default_value_t = DEFAULT_HEARTBEAT_TIMEOUT.as_secs())]
    heartbeat_timeout: u64,

    /// Seconds between heartbeat sweeps
    #[arg(long, default_value_t = DEFAULT_SWEEP_INTERVAL.as_secs())]
    sweep_interval: u64,

    /// Number of broadcaster workers
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKER_COUNT)]
    workers: usize,

    /// Maximum message size in bytes (terminator included)
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Bound the broadcast queue (unbounded if omitted)
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// What to do when a bounded broadcast queue is full
    #[arg(long, value_enum, default_value_t = OverflowPolicy::Reject)]
    overflow_policy: OverflowPolicy,

    /// Rooms that exist at startup (repeatable; defaults to room1, room2, room3)
    #[arg(long = "room")]
    rooms: Vec<String>,
}

impl Args {
    fn relay_config(&self) -> RelayConfig {
        let mut config = RelayConfig {
            heartbeat_timeout: Duration::from_secs(self.heartbeat_timeout),
            sweep_interval: Duration::from_secs(self.sweep_interval),
            worker_count: self.workers,
            max_message_size: self.max_message_size,
            queue_capacity: self.queue_capacity,
            overflow_policy: self.overflow_policy,
            ..RelayConfig::default()
        };
        if !self.rooms.is_empty() {
            config.default_rooms = self.rooms.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = args.relay_config();

    // 1. Transport (in-process mailboxes)
    let transport = Arc::new(InMemoryMailboxTransport::new(config.max_message_size));

    // 2. Relay core
    let relay = match Relay::new(config, transport, Arc::new(SystemClock))
        .start()
        .await
    {
        Ok(relay) => relay,
        Err(e) => {
            tracing::error!("Failed to start relay: {}", e);
            std::process::exit(1);
        }
    };

    // 3. Gateway
    if let Err(e) = Server::new(relay).run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
