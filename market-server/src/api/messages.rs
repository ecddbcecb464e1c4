//! Message API handlers
//!
//! Direct messages between users, optionally attached to an advertisement
//! or threaded as replies. All routes require authentication; a message is
//! visible only to its two participants.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Conversation, Message, MessageCreate};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::db::messages::MessageFilter;
use crate::state::AppState;
use crate::validation;

// ── Query parameters ──

#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    /// Restrict to the exchange with this participant
    pub with: Option<i64>,
    pub unread_only: Option<bool>,
}

// ── Handlers ──

/// POST /api/messages
pub async fn send(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<MessageCreate>,
) -> ApiResult<Message> {
    validation::validate_required_text(&req.content, "content", validation::MAX_CONTENT_LEN)?;

    let message = db::messages::send(&state.pool, user.id, &req).await?;

    tracing::info!(
        message_id = message.id,
        sender_id = user.id,
        receiver_id = message.receiver_id,
        "Message sent"
    );

    Ok(Json(message))
}

/// GET /api/messages — newest first, sent or received by the caller
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(q): Query<MessageListQuery>,
) -> ApiResult<Vec<Message>> {
    let filter = MessageFilter {
        with: q.with,
        unread_only: q.unread_only.unwrap_or(false),
    };

    let messages = db::messages::list(&state.pool, user.id, &filter)
        .await
        .map_err(internal)?;
    Ok(Json(messages))
}

/// GET /api/messages/conversations — one entry per participant pair
pub async fn conversations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Vec<Conversation>> {
    let conversations = db::messages::conversations(&state.pool, user.id)
        .await
        .map_err(internal)?;
    Ok(Json(conversations))
}

/// GET /api/messages/{id} — participants only
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Message> {
    let message = db::messages::get(&state.pool, id).await?;

    if message.sender_id != user.id && message.receiver_id != user.id {
        return Err(AppError::not_resource_owner());
    }
    Ok(Json(message))
}

/// PATCH /api/messages/{id}/read — receiver only
pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Message> {
    let message = db::messages::get(&state.pool, id).await?;

    if message.receiver_id != user.id {
        return Err(AppError::not_resource_owner());
    }

    Ok(Json(db::messages::mark_read(&state.pool, id).await?))
}

/// DELETE /api/messages/{id} — sender or admin
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    let message = db::messages::get(&state.pool, id).await?;

    if message.sender_id != user.id && !user.is_admin() {
        return Err(AppError::not_resource_owner());
    }

    db::messages::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

// ── Helpers ──

fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Message query error: {e}");
    AppError::new(ErrorCode::InternalError)
}
