//! Inbound line protocol DTOs.

use serde::{Deserialize, Deserializer};

/// A message line as sent by a client.
///
/// Only the fields a client owns are read; `id` and `date` are assigned by
/// the server and ignored here if present. A missing or `null` field reads as
/// an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct IncomingMessage {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub room: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl IncomingMessage {
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
