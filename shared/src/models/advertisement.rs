//! Advertisement Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Advertisement entity (user-posted listing, distinct from catalog products)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Advertisement {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub author_id: i64,
    pub category_id: Option<i64>,
    /// Incremented on every single-item read; never decreases
    pub views: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create advertisement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertisementCreate {
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: Option<i64>,
}

/// Update advertisement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertisementUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub category_id: Option<i64>,
    pub is_active: Option<bool>,
}
