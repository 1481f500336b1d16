//! UseCase: 稼働中ルームの参照

use std::sync::Arc;

use crate::domain::{DisplayName, RoomId, RoomSnapshot};

use super::{error::RoomQueryError, room_registry::RoomRegistry};

pub struct RoomQueryUseCase {
    registry: Arc<RoomRegistry>,
}

impl RoomQueryUseCase {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 稼働中の全ルームのスナップショット（ID 順）
    pub async fn list_rooms(&self) -> Result<Vec<RoomSnapshot>, RoomQueryError> {
        let mut snapshots = Vec::new();
        for handle in self.registry.handles() {
            snapshots.push(handle.snapshot().await?);
        }
        Ok(snapshots)
    }

    pub async fn room_detail(&self, room_id: &RoomId) -> Result<RoomSnapshot, RoomQueryError> {
        let handle = self
            .registry
            .get(room_id)
            .ok_or(RoomQueryError::RoomNotFound)?;
        Ok(handle.snapshot().await?)
    }

    /// 名前がそのルームで現在使われていなければ `true`
    ///
    /// 稼働していないルームには誰もいないので常に `true`。
    pub async fn is_name_available(
        &self,
        room_id: &RoomId,
        name: DisplayName,
    ) -> Result<bool, RoomQueryError> {
        match self.registry.get(room_id) {
            Some(handle) => Ok(!handle.is_name_taken(name).await?),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use hiroba_shared::time::FixedClock;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        domain::{ConnectionId, MessagePusher},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryMessageStore,
        },
        usecase::RoomEvent,
    };

    fn usecase() -> (RoomQueryUseCase, Arc<RoomRegistry>) {
        let registry = Arc::new(RoomRegistry::new(
            Arc::new(InMemoryMessageStore::new()),
            Arc::new(|| Arc::new(WebSocketMessagePusher::new()) as Arc<dyn MessagePusher>),
            Arc::new(FixedClock::new(0)),
        ));
        (RoomQueryUseCase::new(registry.clone()), registry)
    }

    fn room(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn name(value: &str) -> DisplayName {
        DisplayName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_room_detail_not_found() {
        // テスト項目: 稼働していないルームの詳細は RoomNotFound
        // given (前提条件):
        let (usecase, _registry) = usecase();

        // when (操作):
        let result = usecase.room_detail(&room("nowhere")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomQueryError::RoomNotFound));
    }

    #[tokio::test]
    async fn test_name_availability_follows_presence() {
        // テスト項目: 名前の空き状況は現在の在室状況から計算される
        // given (前提条件):
        let (usecase, registry) = usecase();
        let handle = registry.get_or_create(&room("lobby")).await.unwrap();
        let connection_id = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        handle.connect(connection_id.clone(), tx).unwrap();
        handle
            .send_event(connection_id.clone(), RoomEvent::SetName("Alice".to_string()))
            .unwrap();

        // when (操作):
        let alice = usecase
            .is_name_available(&room("lobby"), name("Alice"))
            .await
            .unwrap();
        let bob = usecase
            .is_name_available(&room("lobby"), name("Bob"))
            .await
            .unwrap();
        handle.disconnect(connection_id).unwrap();
        let alice_after_leave = usecase
            .is_name_available(&room("lobby"), name("Alice"))
            .await
            .unwrap();
        let elsewhere = usecase
            .is_name_available(&room("other"), name("Alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!alice);
        assert!(bob);
        assert!(alice_after_leave);
        assert!(elsewhere);
    }

    #[tokio::test]
    async fn test_list_rooms_returns_live_rooms() {
        // テスト項目: 一覧には稼働中のルームだけが ID 順に含まれる
        // given (前提条件):
        let (usecase, registry) = usecase();
        registry.get_or_create(&room("beta")).await.unwrap();
        registry.get_or_create(&room("alpha")).await.unwrap();

        // when (操作):
        let rooms = usecase.list_rooms().await.unwrap();

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }
}
