//! Lazily created rooms, one coordinator per room id.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use hiroba_shared::time::Clock;
use tokio::sync::OnceCell;

use crate::domain::{MessagePusher, MessageStore, RoomId, RoomState, Timestamp};

use super::{
    error::RoomError, room_coordinator::RoomCoordinator, room_handle::RoomHandle,
    write_behind::WriteBehind,
};

/// Builds the pusher for a new room. Rooms never share a pusher.
pub type PusherFactory = Arc<dyn Fn() -> Arc<dyn MessagePusher> + Send + Sync>;

pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, Arc<OnceCell<RoomHandle>>>>,
    store: Arc<dyn MessageStore>,
    pusher_factory: PusherFactory,
    clock: Arc<dyn Clock>,
}

impl RoomRegistry {
    pub fn new(
        store: Arc<dyn MessageStore>,
        pusher_factory: PusherFactory,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            store,
            pusher_factory,
            clock,
        }
    }

    /// Return the live room, hydrating and spawning it on first use.
    ///
    /// Concurrent callers for the same id wait on the same initialization. A
    /// failed hydration leaves the slot empty so the next caller retries.
    pub async fn get_or_create(&self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        let cell = {
            let mut rooms = self.lock_rooms();
            rooms.entry(room_id.clone()).or_default().clone()
        };

        let handle = cell
            .get_or_try_init(|| self.start_room(room_id.clone()))
            .await?;
        Ok(handle.clone())
    }

    async fn start_room(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        let history = self
            .store
            .load_all(&room_id)
            .await
            .map_err(|source| RoomError::Hydration {
                room_id: room_id.clone(),
                source,
            })?;

        tracing::info!(
            "Room '{}' created with {} persisted messages",
            room_id,
            history.len()
        );
        let state = RoomState::hydrate(
            room_id.clone(),
            Timestamp::new(self.clock.now_millis()),
            history,
        );
        let coordinator = RoomCoordinator::new(
            state,
            (self.pusher_factory)(),
            WriteBehind::spawn(room_id, self.store.clone()),
            self.clock.clone(),
        );
        Ok(coordinator.spawn())
    }

    /// The live room, if it has been started
    pub fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.lock_rooms()
            .get(room_id)
            .and_then(|cell| cell.get().cloned())
    }

    /// Every live room, ordered by id
    pub fn handles(&self) -> Vec<RoomHandle> {
        let mut handles: Vec<RoomHandle> = self
            .lock_rooms()
            .values()
            .filter_map(|cell| cell.get().cloned())
            .collect();
        handles.sort_by(|a, b| a.room_id().cmp(b.room_id()));
        handles
    }

    /// Wait until every live room has drained its persistence queue
    pub async fn flush_all(&self) {
        for handle in self.handles() {
            if let Err(e) = handle.flush().await {
                tracing::warn!("Failed to flush room '{}': {}", handle.room_id(), e);
            }
        }
    }

    fn lock_rooms(&self) -> std::sync::MutexGuard<'_, HashMap<RoomId, Arc<OnceCell<RoomHandle>>>> {
        self.rooms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use hiroba_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::{ChatMessage, MessageId, MockMessageStore, RepositoryError, Role},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryMessageStore,
        },
    };

    fn room(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn pusher_factory() -> PusherFactory {
        Arc::new(|| Arc::new(WebSocketMessagePusher::new()) as Arc<dyn MessagePusher>)
    }

    fn registry(store: Arc<dyn MessageStore>) -> RoomRegistry {
        RoomRegistry::new(store, pusher_factory(), Arc::new(FixedClock::new(42)))
    }

    fn message(id: &str) -> ChatMessage {
        ChatMessage::new(
            MessageId::new(id.to_string()).unwrap(),
            "hi".to_string(),
            "Alice".to_string(),
            Role::User,
            Timestamp::new(1),
        )
    }

    #[tokio::test]
    async fn test_room_is_hydrated_from_store() {
        // テスト項目: 初回アクセス時に永続化済みの履歴が読み込まれる
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new());
        store.upsert(&room("lobby"), &message("m1")).await.unwrap();
        store.upsert(&room("lobby"), &message("m2")).await.unwrap();
        let registry = registry(store);

        // when (操作):
        let handle = registry.get_or_create(&room("lobby")).await.unwrap();
        let snapshot = handle.snapshot().await.unwrap();

        // then (期待する結果):
        assert_eq!(snapshot.messages, vec![message("m1"), message("m2")]);
        assert_eq!(snapshot.created_at, Timestamp::new(42));
        assert_eq!(snapshot.connection_count, 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_loads_once() {
        // テスト項目: 同じルームへの同時アクセスでも履歴の読み込みは 1 回だけ
        // given (前提条件):
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let mut store = MockMessageStore::new();
        store.expect_load_all().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        });
        let registry = Arc::new(registry(Arc::new(store)));

        // when (操作):
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.get_or_create(&room("lobby")).await.is_ok()
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap());
        }

        // then (期待する結果):
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(registry.handles().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_hydration_is_retried() {
        // テスト項目: 読み込みに失敗したルームはキャッシュされず、次のアクセスで再試行される
        // given (前提条件):
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mut store = MockMessageStore::new();
        store.expect_load_all().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(RepositoryError::Backend("unavailable".to_string()))
            } else {
                Ok(vec![])
            }
        });
        let registry = registry(Arc::new(store));

        // when (操作):
        let first = registry.get_or_create(&room("lobby")).await;
        let live_after_failure = registry.get(&room("lobby")).is_some();
        let second = registry.get_or_create(&room("lobby")).await;

        // then (期待する結果):
        assert!(matches!(first, Err(RoomError::Hydration { .. })));
        assert!(!live_after_failure);
        assert!(second.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rooms_are_isolated_and_listed_by_id() {
        // テスト項目: ルームごとに別の Coordinator が作られ、一覧は ID 順
        // given (前提条件):
        let registry = registry(Arc::new(InMemoryMessageStore::new()));

        // when (操作):
        let b = registry.get_or_create(&room("b-room")).await.unwrap();
        let a = registry.get_or_create(&room("a-room")).await.unwrap();

        // then (期待する結果):
        let ids: Vec<String> = registry
            .handles()
            .iter()
            .map(|h| h.room_id().to_string())
            .collect();
        assert_eq!(ids, vec!["a-room".to_string(), "b-room".to_string()]);
        assert_eq!(a.room_id(), &room("a-room"));
        assert_eq!(b.room_id(), &room("b-room"));
        assert!(registry.get(&room("c-room")).is_none());
    }
}
