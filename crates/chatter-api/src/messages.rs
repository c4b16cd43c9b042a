use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use chatter_types::api::SendMessageRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/messages: the whole history, oldest first. No paging.
pub async fn get_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let messages = state
        .db
        .list_messages()
        .await
        .map_err(ApiError::internal("Failed to fetch messages"))?;

    Ok(Json(messages))
}

/// POST /api/messages
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let message = state
        .db
        .append_message(req.user, req.content)
        .await
        .map_err(ApiError::internal("Failed to add message"))?;

    debug!("Message {} from {}", message.id, message.user);
    Ok((StatusCode::CREATED, Json(message)))
}
