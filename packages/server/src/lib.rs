//! Real-time chat room server library.
//!
//! Every room is owned by a single coordinator task that serializes
//! connections, presence and message upserts, broadcasts the results and
//! persists messages behind the scenes.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

#[cfg(test)]
mod test_support;
