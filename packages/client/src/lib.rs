//! Terminal client for Hiroba chat rooms.

pub mod chat_log;
mod domain;
pub mod error;
mod formatter;
pub mod room_name;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
