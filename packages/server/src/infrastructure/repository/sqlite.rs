//! SQLite Message Store 実装
//!
//! `sqlx` を使った永続化。メッセージのフィールドは必ずバインドパラメータで渡し、
//! SQL 文字列に埋め込まない。
//!
//! ```text
//! DB Row → (id, user, role, content, timestamp) → ChatMessage (ドメインモデル)
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::domain::{
    ChatMessage, MessageId, MessageStore, RepositoryError, Role, RoomId, Timestamp,
};

const CREATE_MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    room_id TEXT NOT NULL,
    id TEXT NOT NULL,
    user TEXT NOT NULL,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    PRIMARY KEY (room_id, id)
)
"#;

// ON CONFLICT DO UPDATE keeps the original rowid, so ordering by rowid
// yields first-seen order.
const UPSERT_MESSAGE: &str = r#"
INSERT INTO messages (room_id, id, user, role, content, timestamp)
VALUES (?, ?, ?, ?, ?, ?)
ON CONFLICT (room_id, id) DO UPDATE SET
    user = excluded.user,
    role = excluded.role,
    content = excluded.content,
    timestamp = excluded.timestamp
"#;

const SELECT_ROOM_MESSAGES: &str = r#"
SELECT id, user, role, content, timestamp
FROM messages
WHERE room_id = ?
ORDER BY rowid
"#;

type MessageRow = (String, String, String, String, i64);

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        RepositoryError::Backend(e.to_string())
    }
}

/// SQLite Message Store 実装
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// データベースに接続し、テーブルを作成する
    ///
    /// # Arguments
    ///
    /// * `database_url` - 例: `sqlite://hiroba.db`（ファイルが無ければ作成される）
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// インメモリ SQLite に接続する（テスト用）
    ///
    /// インメモリ DB は接続ごとに別物になるため、接続数を 1 に固定する。
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, RepositoryError> {
        sqlx::query(CREATE_MESSAGES_TABLE).execute(&pool).await?;
        tracing::info!("SQLite message store ready");
        Ok(Self { pool })
    }
}

fn row_to_message(row: MessageRow) -> Result<ChatMessage, RepositoryError> {
    let (id, user, role, content, timestamp) = row;
    let role = Role::from_str(&role).map_err(|e| RepositoryError::CorruptRow {
        id: id.clone(),
        reason: e.to_string(),
    })?;
    let message_id = MessageId::new(id.clone()).map_err(|e| RepositoryError::CorruptRow {
        id,
        reason: e.to_string(),
    })?;
    Ok(ChatMessage::new(
        message_id,
        content,
        user,
        role,
        Timestamp::new(timestamp),
    ))
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn upsert(&self, room_id: &RoomId, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(UPSERT_MESSAGE)
            .bind(room_id.as_str())
            .bind(message.id.as_str())
            .bind(&message.user)
            .bind(message.role.as_str())
            .bind(&message.content)
            .bind(message.timestamp.value())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn load_all(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows: Vec<MessageRow> = sqlx::query_as(SELECT_ROOM_MESSAGES)
            .bind(room_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_message).collect()
    }
}
