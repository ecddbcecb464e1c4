//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Parent category; NULL for roots
    pub parent_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

/// Update category payload
///
/// `parent_id` distinguishes three cases: field absent leaves the parent
/// unchanged, explicit `null` moves the category to the root level, an id
/// re-parents it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::serde_helpers::double_option"
    )]
    pub parent_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

/// Category with nested children (tree endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub children: Vec<CategoryNode>,
}

/// Per-category row in the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStatsEntry {
    pub id: i64,
    pub name: String,
    /// Number of ancestors; roots are level 0
    pub level: i32,
    pub child_count: i64,
    pub product_count: i64,
    pub is_leaf: bool,
}

/// Aggregate stats over the whole category tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total_categories: i64,
    pub root_categories: i64,
    pub leaf_categories: i64,
    pub max_depth: i32,
    pub categories: Vec<CategoryStatsEntry>,
}
