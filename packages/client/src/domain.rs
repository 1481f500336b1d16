//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// One line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Post a new message
    Send(String),
    /// `/name NEW`
    Rename(String),
    /// `/users`
    Users,
    /// `/help` or an unknown command
    Help,
}

/// Interpret an input line. Blank lines yield `None`.
pub fn parse_input(line: &str) -> Option<InputCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(command) = line.strip_prefix('/') else {
        return Some(InputCommand::Send(line.to_string()));
    };
    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();
    match name {
        "name" if !rest.is_empty() => Some(InputCommand::Rename(rest.to_string())),
        "users" => Some(InputCommand::Users),
        _ => Some(InputCommand::Help),
    }
}

/// WebSocket endpoint of `room` on the server at `base_url`
pub fn room_ws_url(base_url: &str, room: &str) -> String {
    format!("{}/rooms/{}/ws", base_url.trim_end_matches('/'), room)
}

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if the error requires immediate exit (e.g., InvalidRoom),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidRoom(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_line_as_message() {
        // テスト項目: 通常の行はメッセージ送信として扱われ、前後の空白は除かれる
        // given (前提条件):
        let line = "  hello there  ";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, Some(InputCommand::Send("hello there".to_string())));
    }

    #[test]
    fn test_parse_blank_line() {
        // テスト項目: 空行は何もしない
        // given (前提条件):
        let line = "   ";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, None);
    }

    #[test]
    fn test_parse_rename() {
        // テスト項目: /name の後ろの文字列が新しい名前になる
        // given (前提条件):
        let line = "/name  Carl Jr ";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, Some(InputCommand::Rename("Carl Jr".to_string())));
    }

    #[test]
    fn test_parse_rename_without_name_shows_help() {
        // テスト項目: 名前の無い /name はヘルプ表示になる
        // given (前提条件):
        let line = "/name";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, Some(InputCommand::Help));
    }

    #[test]
    fn test_parse_users_and_unknown_commands() {
        // テスト項目: /users は一覧表示、未知のコマンドはヘルプ表示になる
        // given (前提条件):
        let users = "/users";
        let unknown = "/dance now";

        // when (操作):
        let users = parse_input(users);
        let unknown = parse_input(unknown);

        // then (期待する結果):
        assert_eq!(users, Some(InputCommand::Users));
        assert_eq!(unknown, Some(InputCommand::Help));
    }

    #[test]
    fn test_room_ws_url() {
        // テスト項目: ベース URL の末尾のスラッシュに関係なく接続先 URL が組み立てられる
        // given (前提条件):
        let with_slash = "ws://127.0.0.1:8080/";
        let without_slash = "ws://127.0.0.1:8080";

        // when (操作):
        let a = room_ws_url(with_slash, "apple-book");
        let b = room_ws_url(without_slash, "apple-book");

        // then (期待する結果):
        assert_eq!(a, "ws://127.0.0.1:8080/rooms/apple-book/ws");
        assert_eq!(a, b);
    }

    #[test]
    fn test_should_exit_immediately_with_invalid_room() {
        // テスト項目: InvalidRoom エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::InvalidRoom("bad.room".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_with_invalid_room() {
        // テスト項目: InvalidRoom エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::InvalidRoom("bad.room".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionLost("reset by peer".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }
}
