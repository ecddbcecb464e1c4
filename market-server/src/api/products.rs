//! Product API handlers
//!
//! Catalog CRUD with filtered, paginated listing. Writes are admin-gated;
//! reads are public. `include_inactive` is honored only for admin callers.

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;

use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Page, Product, ProductCreate, ProductUpdate};

use super::ApiResult;
use crate::auth::{AdminUser, CurrentUser};
use crate::db;
use crate::db::products::ProductFilter;
use crate::state::AppState;
use crate::validation;

// ── Query parameters ──

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub include_inactive: Option<bool>,
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

// ── Handlers ──

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<ProductCreate>,
) -> ApiResult<Product> {
    validation::validate_required_text(&req.name, "name", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(
        &req.description,
        "description",
        validation::MAX_DESCRIPTION_LEN,
    )?;
    validate_price(req.price)?;
    validate_stock(req.stock)?;

    let product = db::products::create(&state.pool, &req).await?;

    tracing::info!(product_id = product.id, name = %product.name, "Product created");

    Ok(Json(product))
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(q): Query<ProductListQuery>,
) -> ApiResult<Page<Product>> {
    let page = q.page.unwrap_or(1).max(1);
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100);

    let filter = ProductFilter {
        category_id: q.category_id,
        search: q.search,
        min_price: q.min_price,
        max_price: q.max_price,
        in_stock: q.in_stock.unwrap_or(false),
        include_inactive: q.include_inactive.unwrap_or(false)
            && user.as_ref().is_some_and(CurrentUser::is_admin),
    };

    let products = db::products::list(&state.pool, &filter, page, per_page)
        .await
        .map_err(internal)?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Product> {
    Ok(Json(db::products::get(&state.pool, id).await?))
}

/// PATCH /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<ProductUpdate>,
) -> ApiResult<Product> {
    if let Some(name) = &req.name {
        validation::validate_required_text(name, "name", validation::MAX_NAME_LEN)?;
    }
    validation::validate_optional_text(
        &req.description,
        "description",
        validation::MAX_DESCRIPTION_LEN,
    )?;
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(stock) = req.stock {
        validate_stock(stock)?;
    }

    Ok(Json(db::products::update(&state.pool, id, &req).await?))
}

/// DELETE /api/products/{id} — hard delete, images cascade
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    db::products::delete(&state.pool, id).await?;

    tracing::info!(product_id = id, "Product deleted");

    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/products/{id}/soft
pub async fn soft_delete(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    db::products::soft_delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

// ── Helpers ──

fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::new(ErrorCode::ProductInvalidStock));
    }
    Ok(())
}

fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Product query error: {e}");
    AppError::new(ErrorCode::InternalError)
}
