//! Message envelope exchanged between clients and the relay server.
//!
//! Clients send one JSON object per line. The server answers with one JSON
//! array per line, even for a single message, or with an error frame when a
//! handshake is refused.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::format_local;

/// A single chat message as stored in the message log and relayed to clients.
///
/// `id` and `date` are owned by the server: whatever a client puts there is
/// overwritten at ingress. Every field has a default so partial envelopes decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Message {
    pub id: i64,
    pub name: String,
    pub date: DateTime<Utc>,
    pub room: String,
    pub content: String,
}

impl Message {
    /// Create a client-side message; `id` and `date` are left for the server.
    pub fn new(name: impl Into<String>, room: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            room: room.into(),
            content: content.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} --- {}", self.name, format_local(&self.date))?;
        writeln!(f, "{}", self.content)
    }
}

/// Error frame sent in place of a batch when the server refuses a handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFrame {
    pub error: String,
}

impl ErrorFrame {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Any line the server may send to a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    Batch(Vec<Message>),
    Error(ErrorFrame),
}

/// Encode messages as one JSON array, without the trailing newline.
pub fn encode_batch(messages: &[Message]) -> Result<String, serde_json::Error> {
    serde_json::to_string(messages)
}

/// Decode one JSON array of messages.
pub fn decode_batch(line: &str) -> Result<Vec<Message>, serde_json::Error> {
    serde_json::from_str(line.trim())
}

/// Decode any server line, batch or error frame.
pub fn decode_frame(line: &str) -> Result<ServerFrame, serde_json::Error> {
    serde_json::from_str(line.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Clock, FixedClock};

    fn sample_message() -> Message {
        Message {
            id: 7,
            name: "alice".to_string(),
            date: FixedClock::from_millis(1_672_531_200_000).now(),
            room: "lobby".to_string(),
            content: "hi".to_string(),
        }
    }

    #[test]
    fn test_message_round_trip_preserves_client_fields() {
        // テスト項目: エンコードしてデコードしたメッセージがフィールド単位で一致する
        // given (前提条件):
        let message = sample_message();

        // when (操作):
        let json = serde_json::to_string(&message).unwrap();
        let decoded: Message = serde_json::from_str(&json).unwrap();

        // then (期待する結果):
        assert_eq!(decoded.name, message.name);
        assert_eq!(decoded.room, message.room);
        assert_eq!(decoded.content, message.content);
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_partial_envelope_decodes_with_defaults() {
        // テスト項目: id/date/room を省略したエンベロープがデフォルト値でデコードされる
        // given (前提条件):
        let line = r#"{"name":"alice","content":"hi"}"#;

        // when (操作):
        let decoded: Message = serde_json::from_str(line).unwrap();

        // then (期待する結果):
        assert_eq!(decoded.id, 0);
        assert_eq!(decoded.room, "");
        assert_eq!(decoded.date.timestamp(), 0);
        assert_eq!(decoded.content, "hi");
    }

    #[test]
    fn test_encode_batch_wraps_single_message_in_array() {
        // テスト項目: 1 件のメッセージでも JSON 配列としてエンコードされる
        // given (前提条件):
        let message = sample_message();

        // when (操作):
        let line = encode_batch(std::slice::from_ref(&message)).unwrap();

        // then (期待する結果):
        assert!(line.starts_with('['));
        assert!(line.ends_with(']'));
        assert!(!line.contains('\n'));
        assert!(line.contains(r#""date":"2023-01-01T00:00:00Z""#));
        assert_eq!(decode_batch(&line).unwrap(), vec![message]);
    }

    #[test]
    fn test_decode_frame_distinguishes_batch_and_error() {
        // テスト項目: サーバーからの行がバッチとエラーフレームに判別される
        // given (前提条件):
        let batch_line = r#"[{"id":1,"name":"alice","content":"hi"}]"#;
        let error_line = r#"{"error":"name 'alice' is already connected"}"#;

        // when (操作):
        let batch = decode_frame(batch_line).unwrap();
        let error = decode_frame(error_line).unwrap();

        // then (期待する結果):
        assert!(matches!(batch, ServerFrame::Batch(ref messages) if messages.len() == 1));
        assert_eq!(
            error,
            ServerFrame::Error(ErrorFrame::new("name 'alice' is already connected"))
        );
    }

    #[test]
    fn test_decode_batch_rejects_single_object() {
        // テスト項目: 配列でない行はバッチとしてデコードできない
        // given (前提条件):
        let line = r#"{"name":"alice","content":"hi"}"#;

        // when (操作):
        let result = decode_batch(line);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_display_shows_name_and_content() {
        // テスト項目: 表示形式に送信者名と本文が含まれる
        // given (前提条件):
        let message = sample_message();

        // when (操作):
        let rendered = message.to_string();

        // then (期待する結果):
        assert!(rendered.starts_with("--- alice --- "));
        assert!(rendered.ends_with("hi\n"));
    }
}
