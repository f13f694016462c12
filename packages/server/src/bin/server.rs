//! Broadcast chat relay server.
//!
//! Accepts TCP clients, stamps each message with an id and time, and relays it
//! to every connected client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin rtchat-server
//! cargo run --bin rtchat-server -- --host 0.0.0.0 --port 7007 --admin-port 8080
//! ```

use std::sync::Arc;

use clap::Parser;
use rtchat_server::{
    app::build_server,
    config::{
        BackendKeys, DEFAULT_CHANNEL, DEFAULT_ID_KEY, DEFAULT_MAX_LINE_LENGTH,
        DEFAULT_MESSAGES_KEY, DEFAULT_PORT, DuplicateNamePolicy, ServerConfig,
    },
    infrastructure::{backend::InMemoryBackend, registry::InMemoryConnectionRegistry},
    ui::shutdown_signal,
};
use rtchat_shared::{logger::setup_logger, time::SystemClock};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "rtchat-server")]
#[command(about = "TCP chat relay server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number for chat clients
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Port number for the admin HTTP API (disabled if omitted)
    #[arg(long)]
    admin_port: Option<u16>,

    /// Pub/sub channel new messages are published on
    #[arg(long, default_value = DEFAULT_CHANNEL)]
    channel: String,

    /// Counter key used to number messages
    #[arg(long, default_value = DEFAULT_ID_KEY)]
    id_key: String,

    /// Log key messages are appended to
    #[arg(long, default_value = DEFAULT_MESSAGES_KEY)]
    messages_key: String,

    /// What to do when a name is already connected
    #[arg(long, value_enum, default_value_t = DuplicateNamePolicy::Reject)]
    duplicate_names: DuplicateNamePolicy,

    /// Longest accepted inbound line, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            admin_port: args.admin_port,
            keys: BackendKeys {
                channel: args.channel,
                id_key: args.id_key,
                messages_key: args.messages_key,
            },
            duplicate_names: args.duplicate_names,
            max_line_length: args.max_line_length,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // 1. Registry and backend (in-memory)
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let backend = Arc::new(InMemoryBackend::new());

    // 2. Server
    let server = build_server(args.into(), registry, backend, Arc::new(SystemClock));

    // 3. Shutdown on Ctrl+C / SIGTERM
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    if let Err(e) = server.run(shutdown).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
