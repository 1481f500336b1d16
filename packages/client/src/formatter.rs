//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::websocket::{ChatMessageDto, SystemEventKind};
use hiroba_shared::time::timestamp_to_local_hhmm;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner shown after connecting
    pub fn format_welcome(room: &str, name: &str) -> String {
        format!(
            "\nRoom '{}'. You are '{}'.\n\
             Type messages and press Enter to send. /help for commands, Ctrl+C to exit.\n",
            room, name
        )
    }

    /// Format the full history received on connect
    pub fn format_history(messages: &[ChatMessageDto]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        if messages.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for message in messages {
                output.push_str(&Self::format_line(message));
            }
        }
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a message someone posted
    pub fn format_chat_message(message: &ChatMessageDto) -> String {
        format!("\n{}", Self::format_line(message))
    }

    /// Format a message that was edited in place
    pub fn format_edited_message(message: &ChatMessageDto) -> String {
        format!(
            "\n[{}] {} (edited): {}\n",
            timestamp_to_local_hhmm(message.timestamp),
            message.user,
            message.content
        )
    }

    pub fn format_presence(event: SystemEventKind, user: &str) -> String {
        match event {
            SystemEventKind::Join => format!("\n+ {} joined\n", user),
            SystemEventKind::Leave => format!("\n- {} left\n", user),
        }
    }

    /// Format the online list, marking the current user
    pub fn format_users(users: &[String], me: &str) -> String {
        if users.is_empty() {
            return "\nOnline: (nobody)\n".to_string();
        }
        let names: Vec<String> = users
            .iter()
            .map(|user| {
                if user == me {
                    format!("{} (me)", user)
                } else {
                    user.clone()
                }
            })
            .collect();
        format!("\nOnline: {}\n", names.join(", "))
    }

    pub fn format_help() -> String {
        "\nCommands:\n  /name NEW   change your display name\n  /users      list who is online\n  /help       show this help\n"
            .to_string()
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    fn format_line(message: &ChatMessageDto) -> String {
        format!(
            "[{}] {}: {}\n",
            timestamp_to_local_hhmm(message.timestamp),
            message.user,
            message.content
        )
    }
}
