//! Test doubles shared by unit tests.

use std::{collections::HashSet, sync::Mutex};

use async_trait::async_trait;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomNotification,
};

/// MessagePusher that records every delivery instead of writing to sockets.
///
/// Like the real pusher it only delivers to registered connections.
#[derive(Default)]
pub struct RecordingPusher {
    registered: Mutex<HashSet<ConnectionId>>,
    deliveries: Mutex<Vec<(ConnectionId, RoomNotification)>>,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered to `connection_id`, oldest first
    pub fn received(&self, connection_id: &ConnectionId) -> Vec<RoomNotification> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| target == connection_id)
            .map(|(_, notification)| notification.clone())
            .collect()
    }

    /// Drain and return every delivery recorded so far
    pub fn take(&self) -> Vec<(ConnectionId, RoomNotification)> {
        std::mem::take(&mut *self.deliveries.lock().unwrap())
    }

    pub fn clear(&self) {
        self.deliveries.lock().unwrap().clear();
    }

    pub fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.registered.lock().unwrap().contains(connection_id)
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, connection_id: ConnectionId, _sender: PusherChannel) {
        self.registered.lock().unwrap().insert(connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.registered.lock().unwrap().remove(connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &RoomNotification,
    ) -> Result<(), MessagePushError> {
        if !self.is_registered(connection_id) {
            return Err(MessagePushError::ConnectionNotFound(
                connection_id.to_string(),
            ));
        }
        self.deliveries
            .lock()
            .unwrap()
            .push((connection_id.clone(), notification.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &RoomNotification,
    ) -> Result<(), MessagePushError> {
        for target in targets {
            if self.is_registered(&target) {
                self.deliveries
                    .lock()
                    .unwrap()
                    .push((target, notification.clone()));
            }
        }
        Ok(())
    }
}
