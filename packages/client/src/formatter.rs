//! Message formatting utilities for client display.

use rtchat_shared::message::Message;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner shown once the handshake has been sent
    ///
    /// # Arguments
    ///
    /// * `name` - The display name sent in the handshake
    /// * `address` - The server address
    pub fn format_welcome(name: &str, address: &str) -> String {
        format!(
            "\nConnected to {} as '{}'. Type messages and press Enter to send. Type 'quit' or 'exit' to leave.\n",
            address, name
        )
    }

    /// Format a relayed chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The envelope received from the server
    ///
    /// # Returns
    ///
    /// The envelope in display form, preceded by a blank line
    pub fn format_message(message: &Message) -> String {
        format!("\n{}", message)
    }

    /// Format a server line that is neither a batch nor an error frame
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
