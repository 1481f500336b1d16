//! MessagePusher trait 定義
//!
//! 接続中のクライアントへイベントを届けるためのインターフェース。
//! WebSocket などの具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RoomNotification};

/// 1 接続分の送信チャンネル。ソケットへの書き込みは受信側のタスクが行う
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// 送信はいずれも接続単位の fire-and-forget で、遅い接続が他の接続や
/// Coordinator の処理を止めてはならない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &RoomNotification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にイベントを送信。一部の接続への失敗は許容される
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &RoomNotification,
    ) -> Result<(), MessagePushError>;
}
