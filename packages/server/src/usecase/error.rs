//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, RoomId};

/// Room へのアクセスに失敗した理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// 永続化された履歴の読み込みに失敗した
    #[error("failed to load history of room '{room_id}': {source}")]
    Hydration {
        room_id: RoomId,
        #[source]
        source: RepositoryError,
    },

    /// Coordinator のタスクが終了している
    #[error("room '{0}' is no longer running")]
    Closed(RoomId),
}

/// Room 参照系ユースケースのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomQueryError {
    #[error("room not found")]
    RoomNotFound,

    #[error(transparent)]
    Room(#[from] RoomError),
}
