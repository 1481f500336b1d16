//! Chat room server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin hiroba-server -- --database sqlite://hiroba.db
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    domain::{MessagePusher, MessageStore},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryMessageStore, SqliteMessageStore},
    },
    ui::Server,
    usecase::{PusherFactory, RoomRegistry},
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time chat room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// SQLite database URL (e.g. sqlite://hiroba.db). Messages are kept in memory when omitted
    #[arg(short = 'd', long)]
    database: Option<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize dependencies in order:
    // 1. MessageStore
    // 2. MessagePusher factory
    // 3. RoomRegistry
    // 4. Server

    // 1. Create MessageStore
    let store: Arc<dyn MessageStore> = match &args.database {
        Some(url) => {
            tracing::info!("Persisting messages to {}", url);
            Arc::new(SqliteMessageStore::connect(url).await?)
        }
        None => {
            tracing::info!("Persisting messages in memory");
            Arc::new(InMemoryMessageStore::new())
        }
    };

    // 2. Each room gets its own MessagePusher (WebSocket implementation)
    let pusher_factory: PusherFactory =
        Arc::new(|| Arc::new(WebSocketMessagePusher::new()) as Arc<dyn MessagePusher>);

    // 3. Create RoomRegistry
    let registry = Arc::new(RoomRegistry::new(
        store,
        pusher_factory,
        Arc::new(SystemClock),
    ));

    // 4. Create and run the server
    Server::new(registry).run(args.host, args.port).await
}
