//! Terminal chat client for the rtchat relay server.
//!
//! Connects over TCP, sends the display name, then sends one message per input
//! line. Type `quit` or `exit` to leave. A name already in use is rejected by
//! the server and the client exits with status 1.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin rtchat-client -- --name alice
//! cargo run --bin rtchat-client -- -H 127.0.0.1 -p 7007 --room lobby
//! ```

use clap::Parser;
use rtchat_client::{domain::is_fatal, run_client};
use rtchat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "rtchat-client")]
#[command(about = "TCP chat client for the rtchat relay server", long_about = None)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short = 'p', long, default_value_t = 7007)]
    port: u16,

    /// Display name (prompted for if omitted)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Room attached to every message
    #[arg(short = 'r', long, default_value = "")]
    room: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let address = format!("{}:{}", args.host, args.port);

    // Run the client
    match run_client(address, args.name, args.room).await {
        Ok(()) => {}
        Err(e) if is_fatal(&e) => {
            tracing::error!("{}", e);
            tracing::error!("Cannot join with this name. Exiting.");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Client error: {}", e);
            std::process::exit(1);
        }
    }
}
