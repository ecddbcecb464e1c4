//! Message database operations
//!
//! Conversations are derived, not stored: one `DISTINCT ON` query picks
//! the last message per participant pair, one grouped query counts the
//! unread messages, and the two are merged in code.

use std::collections::HashMap;

use shared::error::{AppError, ErrorCode};
use shared::models::{Conversation, Message, MessageCreate};
use shared::util::now_millis;
use sqlx::PgPool;

use crate::error::ServiceResult;

/// List filters for a user's messages.
#[derive(Debug, Default)]
pub struct MessageFilter {
    /// Only messages exchanged with this participant
    pub with: Option<i64>,
    /// Only unread messages addressed to the user
    pub unread_only: bool,
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Message>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM messages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Message> {
    let message = find(pool, id)
        .await?
        .ok_or(AppError::new(ErrorCode::MessageNotFound))?;
    Ok(message)
}

pub async fn send(pool: &PgPool, sender_id: i64, data: &MessageCreate) -> ServiceResult<Message> {
    if data.receiver_id == sender_id {
        return Err(AppError::new(ErrorCode::MessageToSelf).into());
    }

    // Inactive receivers read as nonexistent
    let receiver_active: Option<bool> =
        sqlx::query_scalar("SELECT is_active FROM users WHERE id = $1")
            .bind(data.receiver_id)
            .fetch_optional(pool)
            .await?;
    if receiver_active != Some(true) {
        return Err(AppError::new(ErrorCode::ReceiverNotFound).into());
    }

    if let Some(ad_id) = data.advertisement_id {
        let ad_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM advertisements WHERE id = $1)")
                .bind(ad_id)
                .fetch_one(pool)
                .await?;
        if !ad_exists {
            return Err(AppError::new(ErrorCode::AdvertisementNotFound).into());
        }
    }

    if let Some(parent_id) = data.parent_message_id {
        let parent: Option<(i64, i64)> =
            sqlx::query_as("SELECT sender_id, receiver_id FROM messages WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(pool)
                .await?;
        // The reply must stay within the same participant pair
        let valid = matches!(
            parent,
            Some((s, r)) if (s == sender_id && r == data.receiver_id)
                || (s == data.receiver_id && r == sender_id)
        );
        if !valid {
            return Err(AppError::new(ErrorCode::MessageParentInvalid).into());
        }
    }

    let now = now_millis();
    let message = sqlx::query_as(
        r#"
        INSERT INTO messages (sender_id, receiver_id, content, is_read, advertisement_id, parent_message_id, created_at, updated_at)
        VALUES ($1, $2, $3, FALSE, $4, $5, $6, $6)
        RETURNING *
        "#,
    )
    .bind(sender_id)
    .bind(data.receiver_id)
    .bind(data.content.trim())
    .bind(data.advertisement_id)
    .bind(data.parent_message_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

/// Messages where the user is sender or receiver, newest first.
pub async fn list(
    pool: &PgPool,
    user_id: i64,
    filter: &MessageFilter,
) -> Result<Vec<Message>, sqlx::Error> {
    match (filter.with, filter.unread_only) {
        (Some(partner), false) => {
            sqlx::query_as(
                r#"
                SELECT * FROM messages
                WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1)
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .bind(user_id)
            .bind(partner)
            .fetch_all(pool)
            .await
        }
        (Some(partner), true) => {
            sqlx::query_as(
                r#"
                SELECT * FROM messages
                WHERE receiver_id = $1 AND sender_id = $2 AND NOT is_read
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .bind(user_id)
            .bind(partner)
            .fetch_all(pool)
            .await
        }
        (None, true) => {
            sqlx::query_as(
                "SELECT * FROM messages WHERE receiver_id = $1 AND NOT is_read ORDER BY created_at DESC, id DESC",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
        }
        (None, false) => {
            sqlx::query_as(
                "SELECT * FROM messages WHERE sender_id = $1 OR receiver_id = $1 ORDER BY created_at DESC, id DESC",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn mark_read(pool: &PgPool, id: i64) -> ServiceResult<Message> {
    let message: Option<Message> = sqlx::query_as(
        "UPDATE messages SET is_read = TRUE, updated_at = $1 WHERE id = $2 RETURNING *",
    )
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let message = message.ok_or(AppError::new(ErrorCode::MessageNotFound))?;
    Ok(message)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::MessageNotFound).into());
    }
    Ok(())
}

/// Conversation summaries for a user, last message first.
pub async fn conversations(pool: &PgPool, user_id: i64) -> Result<Vec<Conversation>, sqlx::Error> {
    // Last message per unordered participant pair
    let last_messages: Vec<Message> = sqlx::query_as(
        r#"
        SELECT DISTINCT ON (LEAST(sender_id, receiver_id), GREATEST(sender_id, receiver_id)) *
        FROM messages
        WHERE sender_id = $1 OR receiver_id = $1
        ORDER BY LEAST(sender_id, receiver_id), GREATEST(sender_id, receiver_id),
                 created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    if last_messages.is_empty() {
        return Ok(vec![]);
    }

    // Unread messages addressed to the user, grouped by the other side
    let unread_rows: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT sender_id, COUNT(*) FROM messages WHERE receiver_id = $1 AND NOT is_read GROUP BY sender_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    let unread: HashMap<i64, i64> = unread_rows.into_iter().collect();

    let partner_ids: Vec<i64> = last_messages
        .iter()
        .map(|m| {
            if m.sender_id == user_id {
                m.receiver_id
            } else {
                m.sender_id
            }
        })
        .collect();
    let usernames: HashMap<i64, String> = super::users::usernames(pool, &partner_ids)
        .await?
        .into_iter()
        .collect();

    let mut conversations: Vec<Conversation> = last_messages
        .into_iter()
        .map(|m| {
            let partner_id = if m.sender_id == user_id {
                m.receiver_id
            } else {
                m.sender_id
            };
            Conversation {
                partner_id,
                partner_username: usernames.get(&partner_id).cloned().unwrap_or_default(),
                unread_count: unread.get(&partner_id).copied().unwrap_or(0),
                last_message: m,
            }
        })
        .collect();

    conversations.sort_by(|a, b| {
        (b.last_message.created_at, b.last_message.id)
            .cmp(&(a.last_message.created_at, a.last_message.id))
    });

    Ok(conversations)
}
