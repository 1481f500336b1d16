//! InMemory Message Store 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。プロセス終了とともに内容は失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageStore, RepositoryError, RoomId};

/// インメモリ Message Store 実装
#[derive(Default)]
pub struct InMemoryMessageStore {
    /// ルームごとのメッセージ列（初出順）
    rooms: Mutex<HashMap<RoomId, Vec<ChatMessage>>>,
}

impl InMemoryMessageStore {
    /// 新しい InMemoryMessageStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn upsert(&self, room_id: &RoomId, message: &ChatMessage) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let messages = rooms.entry(room_id.clone()).or_default();

        match messages.iter_mut().find(|m| m.id == message.id) {
            Some(existing) => *existing = message.clone(),
            None => messages.push(message.clone()),
        }
        Ok(())
    }

    async fn load_all(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageId, Role, Timestamp};

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn message(id: &str, content: &str) -> ChatMessage {
        ChatMessage::new(
            MessageId::new(id.to_string()).unwrap(),
            content.to_string(),
            "alice".to_string(),
            Role::User,
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_load_all_unknown_room_is_empty() {
        // テスト項目: 未知のルームは空の履歴を返す
        // given (前提条件):
        let store = InMemoryMessageStore::new();

        // when (操作):
        let result = store.load_all(&room("lobby")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates_in_place() {
        // テスト項目: 同じ ID の upsert は位置を保ったまま更新される
        // given (前提条件):
        let store = InMemoryMessageStore::new();
        let lobby = room("lobby");
        store.upsert(&lobby, &message("m1", "hi")).await.unwrap();
        store.upsert(&lobby, &message("m2", "yo")).await.unwrap();

        // when (操作):
        store.upsert(&lobby, &message("m1", "hello")).await.unwrap();

        // then (期待する結果):
        let messages = store.load_all(&lobby).await.unwrap();
        assert_eq!(messages, vec![message("m1", "hello"), message("m2", "yo")]);
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        // テスト項目: ルーム間でメッセージが混ざらない
        // given (前提条件):
        let store = InMemoryMessageStore::new();

        // when (操作):
        store.upsert(&room("a"), &message("m1", "in a")).await.unwrap();
        store.upsert(&room("b"), &message("m1", "in b")).await.unwrap();

        // then (期待する結果):
        assert_eq!(store.load_all(&room("a")).await.unwrap()[0].content, "in a");
        assert_eq!(store.load_all(&room("b")).await.unwrap()[0].content, "in b");
    }
}
