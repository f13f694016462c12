//! TCP client session management.

use futures_util::{SinkExt, StreamExt};
use rtchat_shared::message::{Message, ServerFrame, decode_frame};
use tokio::{
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

use crate::{
    domain::ClientInput,
    error::ClientError,
    formatter::MessageFormatter,
};

/// Open a TCP connection to the server.
pub async fn connect(address: &str) -> Result<TcpStream, ClientError> {
    let stream = TcpStream::connect(address)
        .await
        .map_err(|e| ClientError::ConnectionError(format!("{}: {}", address, e)))?;
    tracing::info!("Connected to chat server at {}", address);
    Ok(stream)
}

/// Run one chat session over an open connection.
///
/// Sends `name` as the handshake line, then forwards every input line from
/// `input` as an envelope and pushes every relayed envelope, formatted, to
/// `output`.
///
/// # Returns
///
/// * `Ok(())` - The user typed an exit command or closed the input
/// * `Err(ClientError::Rejected)` - The server answered the handshake with an error frame
/// * `Err(ClientError::ConnectionError)` - The server closed the stream or an I/O error occurred
pub async fn run_session(
    stream: TcpStream,
    name: &str,
    room: &str,
    mut input: mpsc::UnboundedReceiver<String>,
    output: mpsc::UnboundedSender<String>,
) -> Result<(), ClientError> {
    let (read_half, write_half) = stream.into_split();
    let mut reader: FramedRead<OwnedReadHalf, LinesCodec> =
        FramedRead::new(read_half, LinesCodec::new());
    let mut writer: FramedWrite<OwnedWriteHalf, LinesCodec> =
        FramedWrite::new(write_half, LinesCodec::new());

    writer
        .send(name)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else {
                    tracing::info!("Input closed");
                    return Ok(());
                };
                match ClientInput::from_line(&line) {
                    ClientInput::Exit => {
                        tracing::info!("Leaving the chat");
                        return Ok(());
                    }
                    ClientInput::Empty => {}
                    ClientInput::Send(content) => {
                        let json = match serde_json::to_string(&Message::new(name, room, content)) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("Failed to serialize message: {}", e);
                                continue;
                            }
                        };
                        writer
                            .send(json)
                            .await
                            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
                    }
                }
            }
            frame = reader.next() => {
                let line = match frame {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => return Err(ClientError::ConnectionError(e.to_string())),
                    None => {
                        return Err(ClientError::ConnectionError(
                            "Server closed the connection".to_string(),
                        ));
                    }
                };
                for text in handle_server_line(&line)? {
                    if output.send(text).is_err() {
                        tracing::debug!("Output closed, dropping message");
                    }
                }
            }
        }
    }
}

/// Turn one server line into the texts to display.
fn handle_server_line(line: &str) -> Result<Vec<String>, ClientError> {
    match decode_frame(line) {
        Ok(ServerFrame::Batch(messages)) => Ok(messages
            .iter()
            .map(MessageFormatter::format_message)
            .collect()),
        Ok(ServerFrame::Error(frame)) => Err(ClientError::Rejected(frame.error)),
        Err(e) => {
            tracing::warn!("Undecodable line from server: {}", e);
            Ok(vec![MessageFormatter::format_raw_message(line)])
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::{io::AsyncWriteExt, net::TcpListener};

    use super::*;

    #[test]
    fn test_batch_line_yields_one_text_per_message() {
        // テスト項目: 配列の各メッセージがそれぞれ表示テキストになる
        // given (前提条件):
        let line = r#"[{"id":1,"name":"alice","content":"a"},{"id":2,"name":"bob","content":"b"}]"#;

        // when (操作):
        let texts = handle_server_line(line).unwrap();

        // then (期待する結果):
        assert_eq!(texts.len(), 2);
        assert!(texts[0].contains("--- alice ---"));
        assert!(texts[1].contains("--- bob ---"));
    }

    #[test]
    fn test_error_frame_is_rejection() {
        // テスト項目: エラーフレームは Rejected エラーになる
        // given (前提条件):
        let line = r#"{"error":"name 'alice' is already connected"}"#;

        // when (操作):
        let result = handle_server_line(line);

        // then (期待する結果):
        match result {
            Err(ClientError::Rejected(reason)) => assert!(reason.contains("alice")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_line_is_shown_raw() {
        // テスト項目: 解釈できない行はそのまま表示される
        // given (前提条件):
        let line = "garbage";

        // when (操作):
        let texts = handle_server_line(line).unwrap();

        // then (期待する結果):
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("garbage"));
    }

    #[tokio::test]
    async fn test_session_sends_handshake_and_envelope() {
        // テスト項目: セッションがハンドシェイク行とメッセージ行を送信する
        // given (前提条件):
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = FramedRead::new(stream, LinesCodec::new());
            let handshake = reader.next().await.unwrap().unwrap();
            let envelope = reader.next().await.unwrap().unwrap();
            (handshake, envelope)
        });
        let stream = connect(&address).await.unwrap();
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, _output_rx) = mpsc::unbounded_channel();

        // when (操作):
        input_tx.send("  hello  ".to_string()).unwrap();
        input_tx.send("quit".to_string()).unwrap();
        let result = run_session(stream, "alice", "lobby", input_rx, output_tx).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let (handshake, envelope) = server.await.unwrap();
        assert_eq!(handshake, "alice");
        let message: Message = serde_json::from_str(&envelope).unwrap();
        assert_eq!(message.name, "alice");
        assert_eq!(message.room, "lobby");
        assert_eq!(message.content, "hello");
    }

    #[tokio::test]
    async fn test_server_close_is_connection_error() {
        // テスト項目: サーバーがストリームを閉じるとセッションは ConnectionError で終わる
        // given (前提条件):
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.shutdown().await.unwrap();
        });
        let stream = connect(&address).await.unwrap();
        let (_input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, _output_rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = run_session(stream, "alice", "", input_rx, output_tx).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        // テスト項目: 待ち受けのないアドレスへの接続は ConnectionError になる
        // given (前提条件):
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        // when (操作):
        let result = connect(&address).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::ConnectionError(_))));
    }
}
