//! Admin HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::ParticipantSnapshot;

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// One connected participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub name: String,
    pub connection_id: String,
    /// RFC 3339
    pub connected_at: String,
}

impl From<ParticipantSnapshot> for ParticipantDto {
    fn from(snapshot: ParticipantSnapshot) -> Self {
        Self {
            name: snapshot.name.into_string(),
            connection_id: snapshot.id.to_string(),
            connected_at: snapshot.connected_at.to_rfc3339(),
        }
    }
}

/// Query for `GET /api/messages`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}
