//! User Model

use serde::{Deserialize, Serialize};

/// Public profile of an account (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// "user" or "admin"
    pub role: String,
    pub is_active: bool,
    pub created_at: i64,
}
