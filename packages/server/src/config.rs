//! Server configuration.

use clap::ValueEnum;

/// Default TCP chat port
pub const DEFAULT_PORT: u16 = 7007;

/// Default pub/sub channel carrying new envelopes
pub const DEFAULT_CHANNEL: &str = "message";

/// Default key of the id counter
pub const DEFAULT_ID_KEY: &str = "id";

/// Default key of the message log
pub const DEFAULT_MESSAGES_KEY: &str = "messages";

/// Default maximum length of one inbound line (64KB)
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// What to do when a handshake announces a name that is already connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DuplicateNamePolicy {
    /// Refuse the new connection with an error frame
    #[default]
    Reject,
    /// Let the new connection shadow the existing one, the reference relay behavior
    /// where the registry keeps only the latest connection per name
    Replace,
}

/// Names used against the distribution backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendKeys {
    /// Pub/sub channel for new envelopes
    pub channel: String,
    /// Counter key for envelope ids
    pub id_key: String,
    /// Ordered log key for envelopes
    pub messages_key: String,
}

impl Default for BackendKeys {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.into(),
            id_key: DEFAULT_ID_KEY.into(),
            messages_key: DEFAULT_MESSAGES_KEY.into(),
        }
    }
}

/// Relay server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub host: String,
    /// TCP chat port
    pub port: u16,
    /// Admin HTTP API port, disabled when `None`
    pub admin_port: Option<u16>,
    pub keys: BackendKeys,
    pub duplicate_names: DuplicateNamePolicy,
    /// Longest accepted inbound line, in bytes
    pub max_line_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: DEFAULT_PORT,
            admin_port: None,
            keys: BackendKeys::default(),
            duplicate_names: DuplicateNamePolicy::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Get the chat address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the admin API address to bind to, if enabled
    pub fn admin_bind_address(&self) -> Option<String> {
        self.admin_port.map(|port| format!("{}:{}", self.host, port))
    }
}
