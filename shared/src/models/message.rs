//! Message Model

use serde::{Deserialize, Serialize};

/// Direct message between two users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub is_read: bool,
    /// Listing this message is about, if any
    pub advertisement_id: Option<i64>,
    /// Message being replied to, if any
    pub parent_message_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Send message payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreate {
    pub receiver_id: i64,
    pub content: String,
    pub advertisement_id: Option<i64>,
    pub parent_message_id: Option<i64>,
}

/// One entry in the conversations view: the other participant, the latest
/// message exchanged with them and how many of their messages are unread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub partner_id: i64,
    pub partner_username: String,
    pub last_message: Message,
    pub unread_count: i64,
}
