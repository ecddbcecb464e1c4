//! Category API handlers
//!
//! Flat CRUD plus the tree endpoints (path, descendants, level, is-leaf,
//! subcategories, roots, tree, stats). Tree endpoints load one snapshot of
//! the active categories and walk it in memory (see `hierarchy`).
//! Writes are admin-gated; reads are public.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryNode, CategoryStats, CategoryUpdate};

use super::ApiResult;
use crate::auth::AdminUser;
use crate::db;
use crate::hierarchy;
use crate::state::AppState;
use crate::validation;

// ── Response types ──

#[derive(Debug, Serialize)]
pub struct LevelResponse {
    pub id: i64,
    pub level: i32,
}

#[derive(Debug, Serialize)]
pub struct IsLeafResponse {
    pub id: i64,
    pub is_leaf: bool,
}

// ── Collection endpoints ──

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<CategoryCreate>,
) -> ApiResult<Category> {
    validation::validate_required_text(&req.name, "name", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(
        &req.description,
        "description",
        validation::MAX_DESCRIPTION_LEN,
    )?;

    let category = db::categories::create(&state.pool, &req).await?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok(Json(category))
}

/// GET /api/categories — flat list of active categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = db::categories::load_active(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(categories))
}

/// GET /api/categories/root
pub async fn roots(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let roots = db::categories::roots(&state.pool).await.map_err(internal)?;
    Ok(Json(roots))
}

/// GET /api/categories/tree
pub async fn tree(State(state): State<AppState>) -> ApiResult<Vec<CategoryNode>> {
    let snapshot = db::categories::load_active(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(hierarchy::tree(&snapshot)))
}

/// GET /api/categories/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<CategoryStats> {
    let snapshot = db::categories::load_active(&state.pool)
        .await
        .map_err(internal)?;
    let product_counts: HashMap<i64, i64> = db::categories::product_counts(&state.pool)
        .await
        .map_err(internal)?
        .into_iter()
        .collect();

    Ok(Json(hierarchy::stats(&snapshot, &product_counts)))
}

// ── Single-item endpoints ──

/// GET /api/categories/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Category> {
    Ok(Json(db::categories::get(&state.pool, id).await?))
}

/// PATCH /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<CategoryUpdate>,
) -> ApiResult<Category> {
    if let Some(name) = &req.name {
        validation::validate_required_text(name, "name", validation::MAX_NAME_LEN)?;
    }
    validation::validate_optional_text(
        &req.description,
        "description",
        validation::MAX_DESCRIPTION_LEN,
    )?;

    Ok(Json(db::categories::update(&state.pool, id, &req).await?))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    db::categories::delete(&state.pool, id).await?;

    tracing::info!(category_id = id, "Category deleted");

    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/categories/{id}/soft
pub async fn soft_delete(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    db::categories::soft_delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

// ── Tree walk endpoints ──

/// GET /api/categories/{id}/path — root → leaf chain ending at the category
pub async fn path(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Vec<Category>> {
    let snapshot = db::categories::load_active(&state.pool)
        .await
        .map_err(internal)?;
    let path = hierarchy::path(&snapshot, id).ok_or_else(not_in_tree)?;
    Ok(Json(path))
}

/// GET /api/categories/{id}/descendants — pre-order subtree, excluding self
pub async fn descendants(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<Category>> {
    let snapshot = db::categories::load_active(&state.pool)
        .await
        .map_err(internal)?;
    let descendants = hierarchy::descendants(&snapshot, id).ok_or_else(not_in_tree)?;
    Ok(Json(descendants))
}

/// GET /api/categories/{id}/level
pub async fn level(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<LevelResponse> {
    let snapshot = db::categories::load_active(&state.pool)
        .await
        .map_err(internal)?;
    let level = hierarchy::level(&snapshot, id).ok_or_else(not_in_tree)?;
    Ok(Json(LevelResponse { id, level }))
}

/// GET /api/categories/{id}/is-leaf
pub async fn is_leaf(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<IsLeafResponse> {
    let snapshot = db::categories::load_active(&state.pool)
        .await
        .map_err(internal)?;
    let is_leaf = hierarchy::is_leaf(&snapshot, id).ok_or_else(not_in_tree)?;
    Ok(Json(IsLeafResponse { id, is_leaf }))
}

/// GET /api/categories/{id}/subcategories — direct active children
pub async fn subcategories(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<Category>> {
    Ok(Json(db::categories::subcategories(&state.pool, id).await?))
}

// ── Helpers ──

fn not_in_tree() -> AppError {
    AppError::new(ErrorCode::CategoryNotFound)
}

fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Category query error: {e}");
    AppError::new(ErrorCode::InternalError)
}
