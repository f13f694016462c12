//! Admin HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use rtchat_shared::message::Message;

use crate::{
    infrastructure::dto::http::{HealthDto, HistoryQuery, ParticipantDto},
    ui::state::AppState,
    usecase::DEFAULT_HISTORY_LIMIT,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// List connected participants, sorted by name
pub async fn get_participants(State(state): State<Arc<AppState>>) -> Json<Vec<ParticipantDto>> {
    let participants = state.get_participants_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(participants.into_iter().map(ParticipantDto::from).collect())
}

/// Read the tail of the message log
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Message>>, StatusCode> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match state.get_history_usecase.execute(limit).await {
        Ok(messages) => Ok(Json(messages)),
        Err(e) => {
            tracing::error!("Failed to read message history: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
