//! Message store 実装
//!
//! - `inmemory`: プロセス内の HashMap を使った実装（デフォルト）
//! - `sqlite`: `sqlx` を使った SQLite 実装

pub mod inmemory;
pub mod sqlite;

pub use inmemory::InMemoryMessageStore;
pub use sqlite::SqliteMessageStore;
