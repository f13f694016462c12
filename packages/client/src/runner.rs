//! Client execution: terminal input, output, and one session.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    error::ClientError,
    formatter::MessageFormatter,
    session::{connect, run_session},
    ui::redisplay_prompt,
};

/// Run the chat client until the user exits or the connection ends
///
/// # Arguments
///
/// * `address` - Server address (`host:port`)
/// * `name` - Display name; prompted for on the terminal when `None`
/// * `room` - Room attached to every outgoing message
pub async fn run_client(
    address: String,
    name: Option<String>,
    room: String,
) -> Result<(), ClientError> {
    let name = match name {
        Some(name) => name,
        None => prompt_name().await?,
    };

    let stream = connect(&address).await?;
    print!("{}", MessageFormatter::format_welcome(&name, &address));

    // Create channel for rustyline input
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = format!("{}> ", name);

    // Spawn a blocking thread for rustyline (synchronous readline)
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.trim()).ok();
                    }
                    if input_tx.send(line).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Print relayed messages and redisplay the prompt
    let (output_tx, mut output_rx) = mpsc::unbounded_channel::<String>();
    let name_for_print = name.clone();
    let print_task = tokio::spawn(async move {
        while let Some(text) = output_rx.recv().await {
            print!("{}", text);
            redisplay_prompt(&name_for_print);
        }
    });

    let result = run_session(stream, &name, &room, input_rx, output_tx).await;
    if let Err(e) = print_task.await {
        tracing::warn!("Print task failed: {}", e);
    }
    result
}

/// Ask for a non-empty display name on the terminal.
async fn prompt_name() -> Result<String, ClientError> {
    tokio::task::spawn_blocking(|| {
        let mut rl = DefaultEditor::new().map_err(|e| ClientError::Input(e.to_string()))?;
        loop {
            match rl.readline("Your name: ") {
                Ok(line) if !line.trim().is_empty() => return Ok(line.trim().to_string()),
                Ok(_) => println!("Name must not be empty."),
                Err(e) => return Err(ClientError::Input(e.to_string())),
            }
        }
    })
    .await
    .map_err(|e| ClientError::Input(e.to_string()))?
}
