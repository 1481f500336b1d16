//! HTTP / WebSocket server for chat rooms.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
