//! Write-behind queue for message persistence.
//!
//! The coordinator enqueues upserts after it has mutated memory and broadcast;
//! a per-room task applies them to the store in order. A failing write is
//! logged and dropped, it never reaches clients.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ChatMessage, MessageStore, RoomId};

enum WriteRequest {
    Upsert(ChatMessage),
    Flush(oneshot::Sender<()>),
}

pub struct WriteBehind {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl WriteBehind {
    /// Spawn the writer task for `room_id`
    pub fn spawn(room_id: RoomId, store: Arc<dyn MessageStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                match request {
                    WriteRequest::Upsert(message) => {
                        if let Err(e) = store.upsert(&room_id, &message).await {
                            tracing::warn!(
                                "Failed to persist message '{}' in room '{}': {}",
                                message.id.as_str(),
                                room_id,
                                e
                            );
                        }
                    }
                    WriteRequest::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("Write-behind task for room '{}' stopped", room_id);
        });

        Self { tx }
    }

    /// Queue a message for persistence without waiting for it
    pub fn enqueue(&self, message: ChatMessage) {
        if self.tx.send(WriteRequest::Upsert(message)).is_err() {
            tracing::warn!("Write-behind task is gone, dropping write");
        }
    }

    /// Send `()` on `reply` once every write queued so far has been attempted.
    /// Returns immediately; the caller never waits on the store.
    pub fn flush_then_reply(&self, reply: oneshot::Sender<()>) {
        if let Err(mpsc::error::SendError(WriteRequest::Flush(reply))) =
            self.tx.send(WriteRequest::Flush(reply))
        {
            // タスクが無ければ待つべき書き込みも無い
            let _ = reply.send(());
        }
    }

    /// Wait until every write queued so far has been attempted
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.flush_then_reply(done_tx);
        let _ = done_rx.await;
    }
}
