//! Order API handlers
//!
//! Checkout against catalog products. Creation and deletion run inside one
//! transaction in the db layer (stock, counters, items). Stale orders are
//! auto-completed lazily before reads; the background sweeper runs the same
//! idempotent update. All routes require authentication.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Order, OrderCreate, OrderStatus, Page};

use super::ApiResult;
use crate::auth::{AdminUser, CurrentUser};
use crate::db;
use crate::db::orders::OrderFilter;
use crate::state::AppState;

// ── Request / Query types ──

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    /// List every customer's orders (admin only)
    pub all: Option<bool>,
    pub status: Option<OrderStatus>,
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

// ── Handlers ──

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<OrderCreate>,
) -> ApiResult<Order> {
    let order = db::orders::create(&state.pool, user.id, &req.items).await?;

    tracing::info!(
        order_id = order.id,
        order_number = %order.order_number,
        customer_id = user.id,
        total_items = order.total_items,
        "Order created"
    );

    Ok(Json(order))
}

/// GET /api/orders
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(q): Query<OrderListQuery>,
) -> ApiResult<Page<Order>> {
    expire_stale(&state).await?;

    let all = q.all.unwrap_or(false);
    if all && !user.is_admin() {
        return Err(AppError::admin_required());
    }

    let page = q.page.unwrap_or(1).max(1);
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100);

    let filter = OrderFilter {
        customer_id: if all { None } else { Some(user.id) },
        status: q.status,
    };

    let orders = db::orders::list(&state.pool, &filter, page, per_page)
        .await
        .map_err(internal)?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} — owner or admin
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    expire_stale(&state).await?;

    let order = db::orders::get(&state.pool, id).await?;

    if order.customer_id != user.id && !user.is_admin() {
        return Err(AppError::not_resource_owner());
    }
    Ok(Json(order))
}

/// PATCH /api/orders/{id}/status — admin, linear transitions only
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> ApiResult<Order> {
    let order = db::orders::update_status(&state.pool, id, req.status).await?;

    tracing::info!(
        order_id = id,
        status = order.status.as_str(),
        admin_id = admin.id,
        "Order status updated"
    );

    Ok(Json(order))
}

/// DELETE /api/orders/{id} — restores the decremented stock
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    db::orders::delete(&state.pool, id, user.id, user.is_admin()).await?;

    tracing::info!(order_id = id, user_id = user.id, "Order deleted");

    Ok(Json(ApiResponse::ok()))
}

// ── Helpers ──

/// Lazy counterpart of the background sweep: complete over-age orders
/// before serving reads.
async fn expire_stale(state: &AppState) -> Result<(), AppError> {
    let completed = db::orders::apply_expiry(&state.pool)
        .await
        .map_err(internal)?;
    if completed > 0 {
        tracing::debug!(completed, "Completed expired orders before read");
    }
    Ok(())
}

fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Order query error: {e}");
    AppError::new(ErrorCode::InternalError)
}
