//! Message store trait 定義
//!
//! ドメイン層が必要とする永続化のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChatMessage, RepositoryError, RoomId};

/// Message store trait
///
/// メッセージ ID をキーとした create-or-update のみを要求する永続化層。
/// Coordinator はこの trait にのみ依存し、具体的なストレージエンジンを知らない。
///
/// ## 契約
///
/// - `upsert`: 同じ ID が存在すればその場で更新、無ければ追加する。冪等であること
/// - `load_all`: 初出順に並んだメッセージ列を返す。ルーム起動時に 1 回だけ呼ばれる
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを追加、または同じ ID のメッセージを更新
    async fn upsert(&self, room_id: &RoomId, message: &ChatMessage) -> Result<(), RepositoryError>;

    /// ルームに保存された全メッセージを初出順で取得
    async fn load_all(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RepositoryError>;
}
