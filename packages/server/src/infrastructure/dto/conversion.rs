//! Conversion logic between DTOs and domain entities.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatMessage, DisplayName, MessageId, PresenceEvent, RoomNotification, RoomSnapshot,
    Timestamp, UpsertKind, ValueObjectError,
};
use crate::infrastructure::dto::{
    http::{RoomDetailDto, RoomSummaryDto},
    websocket::{ChatMessageDto, OutboundEvent, SystemEventKind},
};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<ChatMessageDto> for ChatMessage {
    type Error = ValueObjectError;

    fn try_from(dto: ChatMessageDto) -> Result<Self, Self::Error> {
        Ok(ChatMessage::new(
            MessageId::new(dto.id)?,
            dto.content,
            dto.user,
            dto.role,
            Timestamp::new(dto.timestamp),
        ))
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id.into_string(),
            content: model.content,
            user: model.user,
            role: model.role,
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<&RoomNotification> for OutboundEvent {
    fn from(notification: &RoomNotification) -> Self {
        match notification {
            RoomNotification::History(messages) => OutboundEvent::All {
                messages: messages.iter().cloned().map(ChatMessageDto::from).collect(),
            },
            RoomNotification::Upserted { kind, message } => {
                let dto = ChatMessageDto::from(message.clone());
                match kind {
                    UpsertKind::Add => OutboundEvent::Add(dto),
                    UpsertKind::Update => OutboundEvent::Update(dto),
                }
            }
            RoomNotification::OnlineUsers(users) => OutboundEvent::Users {
                users: users.iter().map(|u| u.as_str().to_string()).collect(),
            },
            RoomNotification::Presence { event, user } => OutboundEvent::System {
                event: match event {
                    PresenceEvent::Join => SystemEventKind::Join,
                    PresenceEvent::Leave => SystemEventKind::Leave,
                },
                user: user.as_str().to_string(),
            },
        }
    }
}

fn names_to_strings(names: Vec<DisplayName>) -> Vec<String> {
    names.into_iter().map(DisplayName::into_string).collect()
}

impl From<RoomSnapshot> for RoomSummaryDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            id: snapshot.id.into_string(),
            online_users: names_to_strings(snapshot.online_users),
            connection_count: snapshot.connection_count,
            message_count: snapshot.messages.len(),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

impl From<RoomSnapshot> for RoomDetailDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            id: snapshot.id.into_string(),
            online_users: names_to_strings(snapshot.online_users),
            connection_count: snapshot.connection_count,
            messages: snapshot
                .messages
                .into_iter()
                .map(ChatMessageDto::from)
                .collect(),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, RoomId};

    fn dto(id: &str) -> ChatMessageDto {
        ChatMessageDto {
            id: id.to_string(),
            content: "Hello!".to_string(),
            user: "alice".to_string(),
            role: Role::User,
            timestamp: 1000,
        }
    }

    #[test]
    fn test_dto_chat_message_to_domain() {
        // テスト項目: DTO の ChatMessage がドメインエンティティに変換される
        // given (前提条件):
        let dto_msg = dto("m1");

        // when (操作):
        let domain_msg = ChatMessage::try_from(dto_msg).unwrap();

        // then (期待する結果):
        assert_eq!(domain_msg.id.as_str(), "m1");
        assert_eq!(domain_msg.content, "Hello!");
        assert_eq!(domain_msg.user, "alice");
        assert_eq!(domain_msg.timestamp, Timestamp::new(1000));
    }

    #[test]
    fn test_dto_chat_message_with_empty_id_is_rejected() {
        // テスト項目: ID が空の DTO は変換できない
        // given (前提条件):
        let dto_msg = dto("");

        // when (操作):
        let result = ChatMessage::try_from(dto_msg);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::MessageIdEmpty));
    }

    #[test]
    fn test_upserted_notification_keeps_kind() {
        // テスト項目: add/update の種別が送信イベントに引き継がれる
        // given (前提条件):
        let message = ChatMessage::try_from(dto("m1")).unwrap();
        let notification = RoomNotification::Upserted {
            kind: UpsertKind::Update,
            message,
        };

        // when (操作):
        let event = OutboundEvent::from(&notification);

        // then (期待する結果):
        assert_eq!(event, OutboundEvent::Update(dto("m1")));
    }

    #[test]
    fn test_presence_notification_to_system_event() {
        // テスト項目: 在室遷移が system イベントに変換される
        // given (前提条件):
        let notification = RoomNotification::Presence {
            event: PresenceEvent::Join,
            user: DisplayName::new("Alice".to_string()).unwrap(),
        };

        // when (操作):
        let event = OutboundEvent::from(&notification);

        // then (期待する結果):
        assert_eq!(
            event,
            OutboundEvent::System {
                event: SystemEventKind::Join,
                user: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_snapshot_to_summary() {
        // テスト項目: ルームのスナップショットが一覧用 DTO に変換される
        // given (前提条件):
        let snapshot = RoomSnapshot {
            id: RoomId::new("lobby".to_string()).unwrap(),
            created_at: Timestamp::new(1672531200000),
            online_users: vec![DisplayName::new("Alice".to_string()).unwrap()],
            connection_count: 2,
            messages: vec![ChatMessage::try_from(dto("m1")).unwrap()],
        };

        // when (操作):
        let summary = RoomSummaryDto::from(snapshot);

        // then (期待する結果):
        assert_eq!(summary.id, "lobby");
        assert_eq!(summary.online_users, vec!["Alice".to_string()]);
        assert_eq!(summary.connection_count, 2);
        assert_eq!(summary.message_count, 1);
        assert!(summary.created_at.starts_with("2023-01-01T00:00:00"));
    }
}
