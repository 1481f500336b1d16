//! Terminal chat client.
//!
//! Joins a room, announces a display name and sends every typed line as a
//! message. Automatically reconnects on disconnection (max 5 attempts with
//! 5 second interval) and announces the name again after each reconnect.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client
//! cargo run --bin hiroba-client -- --room apple-book-cat-dog-egg --name Alice
//! ```

use clap::Parser;

use hiroba_client::room_name::{generate_room_id, pick_display_name};
use hiroba_server::domain::{DisplayName, RoomId};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Terminal client for Hiroba chat rooms", long_about = None)]
struct Args {
    /// Server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Room to join. A new room id is generated when omitted
    #[arg(short = 'r', long)]
    room: Option<String>,

    /// Display name. Picked at random when omitted
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let mut rng = rand::rng();

    let room = args.room.unwrap_or_else(|| generate_room_id(&mut rng));
    if let Err(e) = RoomId::new(room.clone()) {
        tracing::error!("Invalid room '{}': {}", room, e);
        std::process::exit(1);
    }
    let name = args.name.unwrap_or_else(|| pick_display_name(&mut rng));
    if let Err(e) = DisplayName::new(name.clone()) {
        tracing::error!("Invalid name: {}", e);
        std::process::exit(1);
    }

    // Run the client
    if let Err(e) = hiroba_client::run_client(args.url, room, name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
