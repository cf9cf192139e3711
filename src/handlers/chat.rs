use axum::{Json, body::Bytes, extract::State};

use super::AppState;
use crate::error::Result;
use crate::models::ChatReply;

/// POST /api/chat
///
/// Always 200 once the message is valid. Relay failures come back as the
/// fallback text.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatReply>> {
    let message = state.validator.chat_message(&body).inspect_err(|e| {
        tracing::warn!(error = %e, "Rejected chat request");
    })?;

    let response = state.relay.reply(&message).await;
    Ok(Json(ChatReply { response }))
}
