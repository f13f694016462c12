//! Domain logic for client-side operations.
//!
//! Pure functions over input lines and errors, kept free of I/O.

use crate::error::ClientError;

/// What one line of terminal input asks the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientInput {
    /// End the session (`quit` or `exit`)
    Exit,
    /// Nothing to send
    Empty,
    /// Send the content as a message
    Send(String),
}

impl ClientInput {
    /// Classify a raw input line.
    ///
    /// The line is trimmed first. The exit sentinels are case-sensitive.
    pub fn from_line(line: &str) -> Self {
        let line = line.trim();
        if is_exit_command(line) {
            ClientInput::Exit
        } else if line.is_empty() {
            ClientInput::Empty
        } else {
            ClientInput::Send(line.to_string())
        }
    }
}

/// Check whether a line is one of the exit sentinels.
pub fn is_exit_command(line: &str) -> bool {
    matches!(line.trim(), "quit" | "exit")
}

/// Check if the client should exit with a failure status.
///
/// A rejected handshake will be rejected again on retry, so it is always fatal.
pub fn is_fatal(error: &ClientError) -> bool {
    matches!(error, ClientError::Rejected(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_sentinels_are_recognized_after_trimming() {
        // テスト項目: quit / exit は前後の空白を除いて終了コマンドと判定される
        // given (前提条件):
        let lines = ["quit", "exit", "  quit  ", "exit\n"];

        // when (操作):
        let results: Vec<ClientInput> = lines.iter().map(|l| ClientInput::from_line(l)).collect();

        // then (期待する結果):
        assert!(results.iter().all(|r| *r == ClientInput::Exit));
    }

    #[test]
    fn test_exit_sentinels_are_case_sensitive() {
        // テスト項目: 大文字を含む QUIT / Exit は終了コマンドではない
        // given (前提条件):
        let lines = ["QUIT", "Exit"];

        // when (操作):
        let results: Vec<ClientInput> = lines.iter().map(|l| ClientInput::from_line(l)).collect();

        // then (期待する結果):
        assert_eq!(
            results,
            vec![
                ClientInput::Send("QUIT".to_string()),
                ClientInput::Send("Exit".to_string())
            ]
        );
    }

    #[test]
    fn test_blank_line_is_empty_input() {
        // テスト項目: 空白のみの行は送信対象にならない
        // given (前提条件):
        let line = "   ";

        // when (操作):
        let result = ClientInput::from_line(line);

        // then (期待する結果):
        assert_eq!(result, ClientInput::Empty);
    }

    #[test]
    fn test_sentinel_inside_sentence_is_sent() {
        // テスト項目: 文中に quit を含む行は通常のメッセージとして送信される
        // given (前提条件):
        let line = " I will quit soon ";

        // when (操作):
        let result = ClientInput::from_line(line);

        // then (期待する結果):
        assert_eq!(result, ClientInput::Send("I will quit soon".to_string()));
    }

    #[test]
    fn test_rejected_is_fatal() {
        // テスト項目: Rejected エラーは致命的と判定され、ConnectionError はそうではない
        // given (前提条件):
        let rejected = ClientError::Rejected("name 'alice' is already connected".to_string());
        let connection = ClientError::ConnectionError("reset".to_string());

        // when (操作):
        let results = (is_fatal(&rejected), is_fatal(&connection));

        // then (期待する結果):
        assert_eq!(results, (true, false));
    }
}
