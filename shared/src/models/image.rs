//! Image Model

use serde::{Deserialize, Serialize};

/// Product image entity
///
/// The payload is stored in-row: either a base64-encoded image or a URL,
/// disambiguated by `content_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Image {
    pub id: i64,
    pub product_id: i64,
    pub data: String,
    pub content_type: String,
    /// At most one primary image per product
    pub is_primary: bool,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCreate {
    pub product_id: i64,
    pub data: String,
    pub content_type: String,
    pub is_primary: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUpdate {
    pub data: Option<String>,
    pub content_type: Option<String>,
    pub is_primary: Option<bool>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
