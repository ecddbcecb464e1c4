//! Order database operations
//!
//! Order creation is one transaction: per-day counter bump, order insert,
//! item inserts with price snapshots, stock decrements. Any failing line
//! aborts the whole request; there are no partial orders.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderItem, OrderItemInput, OrderStatus, Page};
use shared::util::now_millis;
use sqlx::PgPool;

use super::query_builder::QueryBuilder;
use crate::error::ServiceResult;
use crate::orders::{day_key, expiry_cutoff, format_order_number, order_totals, validate_items};

/// List filters.
#[derive(Debug, Default)]
pub struct OrderFilter {
    /// None lists every customer's orders (admin view)
    pub customer_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

pub async fn create(
    pool: &PgPool,
    customer_id: i64,
    items: &[OrderItemInput],
) -> ServiceResult<Order> {
    validate_items(items)?;

    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();

    let mut tx = pool.begin().await?;

    // Lock the product rows so concurrent orders cannot oversell
    let products: Vec<(i64, Decimal, i32, bool)> = sqlx::query_as(
        "SELECT id, price, stock, is_active FROM products WHERE id = ANY($1) FOR UPDATE",
    )
    .bind(&product_ids)
    .fetch_all(&mut *tx)
    .await?;

    let by_id: HashMap<i64, (Decimal, i32, bool)> = products
        .into_iter()
        .map(|(id, price, stock, is_active)| (id, (price, stock, is_active)))
        .collect();

    let mut lines: Vec<(Decimal, i32)> = Vec::with_capacity(items.len());
    for item in items {
        let Some(&(price, stock, is_active)) = by_id.get(&item.product_id) else {
            return Err(AppError::new(ErrorCode::ProductNotFound)
                .with_detail("product_id", item.product_id)
                .into());
        };
        if !is_active {
            return Err(AppError::new(ErrorCode::ProductNotFound)
                .with_detail("product_id", item.product_id)
                .into());
        }
        if item.quantity > stock {
            return Err(AppError::new(ErrorCode::ProductOutOfStock)
                .with_detail("product_id", item.product_id)
                .with_detail("requested", item.quantity)
                .with_detail("available", stock)
                .into());
        }
        lines.push((price, item.quantity));
    }

    let (total_amount, total_items) = order_totals(&lines);

    // Per-day sequence, bumped inside this transaction: concurrent
    // same-second orders still get distinct numbers
    let at = chrono::Utc::now();
    let seq: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO order_counters (day, seq) VALUES ($1, 1)
        ON CONFLICT (day) DO UPDATE SET seq = order_counters.seq + 1
        RETURNING seq
        "#,
    )
    .bind(day_key(at))
    .fetch_one(&mut *tx)
    .await?;

    let order_number = format_order_number(at, i64::from(seq));
    let now = now_millis();

    let mut order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (order_number, customer_id, status, total_amount, total_items, created_at, updated_at)
        VALUES ($1, $2, 'PENDING', $3, $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(&order_number)
    .bind(customer_id)
    .bind(total_amount)
    .bind(total_items)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    // Line items with the price snapshotted from the locked rows
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let prices: Vec<Decimal> = lines.iter().map(|(price, _)| *price).collect();
    let order_ids: Vec<i64> = items.iter().map(|_| order.id).collect();
    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, quantity, price) SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::integer[], $4::numeric[])",
    )
    .bind(&order_ids)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&prices)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE products SET stock = stock - u.quantity, updated_at = $3
        FROM (SELECT * FROM UNNEST($1::bigint[], $2::integer[])) AS u(product_id, quantity)
        WHERE products.id = u.product_id
        "#,
    )
    .bind(&product_ids)
    .bind(&quantities)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    order.items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order.id)
        .fetch_all(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(order)
}

pub async fn list(
    pool: &PgPool,
    filter: &OrderFilter,
    page: i32,
    per_page: i32,
) -> Result<Page<Order>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    if let Some(customer_id) = filter.customer_id {
        qb.eq_i64("customer_id", customer_id);
    }
    if let Some(status) = filter.status {
        qb.eq_text("status", status.as_str());
    }

    let where_clause = qb.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM orders{where_clause}");
    let total: i64 = qb
        .apply_bindings_scalar(sqlx::query_scalar(&count_sql))
        .fetch_one(pool)
        .await?;

    let offset = (page as i64 - 1) * per_page as i64;
    let page_sql = format!(
        "SELECT * FROM orders{where_clause} ORDER BY created_at DESC, id DESC LIMIT {per_page} OFFSET {offset}"
    );
    let mut orders: Vec<Order> = qb
        .apply_bindings(sqlx::query_as(&page_sql))
        .fetch_all(pool)
        .await?;

    // Attach items with one batched query
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    if !ids.is_empty() {
        let rows: Vec<OrderItem> =
            sqlx::query_as("SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY id")
                .bind(&ids)
                .fetch_all(pool)
                .await?;
        let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(row);
        }
        for order in &mut orders {
            order.items = by_order.remove(&order.id).unwrap_or_default();
        }
    }

    Ok(Page::new(orders, total, page, per_page))
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Order> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let mut order = order.ok_or(AppError::new(ErrorCode::OrderNotFound))?;

    order.items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(order)
}

/// Admin status change. Transitions are linear; COMPLETED is terminal
/// and stamps `completed_at`.
pub async fn update_status(
    pool: &PgPool,
    id: i64,
    new_status: OrderStatus,
) -> ServiceResult<Order> {
    let mut tx = pool.begin().await?;

    let current: Order = sqlx::query_as("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::new(ErrorCode::OrderNotFound))?;

    if current.status == OrderStatus::Completed {
        return Err(AppError::new(ErrorCode::OrderAlreadyCompleted).into());
    }
    if !current.status.can_transition_to(new_status) {
        return Err(AppError::with_message(
            ErrorCode::OrderStatusInvalid,
            format!(
                "Cannot move order {} from {} to {}",
                current.order_number,
                current.status.as_str(),
                new_status.as_str()
            ),
        )
        .into());
    }

    let now = now_millis();
    let completed_at = (new_status == OrderStatus::Completed).then_some(now);
    let mut order: Order = sqlx::query_as(
        r#"
        UPDATE orders SET status = $1, completed_at = COALESCE($2, completed_at), updated_at = $3
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(new_status)
    .bind(completed_at)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    order.items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(order)
}

/// Delete an order, restoring exactly the stock it decremented, in one
/// transaction. Customers may delete their own PENDING orders; admins
/// any order. The guards run inside the transaction because the status
/// may flip between a read and the delete.
pub async fn delete(
    pool: &PgPool,
    id: i64,
    requester_id: i64,
    is_admin: bool,
) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let order: Order = sqlx::query_as("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::new(ErrorCode::OrderNotFound))?;

    if !is_admin {
        if order.customer_id != requester_id {
            return Err(AppError::new(ErrorCode::NotResourceOwner).into());
        }
        if order.status != OrderStatus::Pending {
            return Err(AppError::new(ErrorCode::OrderNotPending).into());
        }
    }

    // Put back exactly what the order took out
    sqlx::query(
        r#"
        UPDATE products SET stock = stock + oi.quantity, updated_at = $2
        FROM order_items oi
        WHERE oi.order_id = $1 AND products.id = oi.product_id
        "#,
    )
    .bind(id)
    .bind(now_millis())
    .execute(&mut *tx)
    .await?;

    // Items cascade
    sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Complete every order stuck in PENDING / IN_PROGRESS beyond the expiry
/// window. Idempotent; the lazy read-path check and the sweeper both
/// call this.
pub async fn apply_expiry(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let now = now_millis();
    let rows = sqlx::query(
        r#"
        UPDATE orders SET status = 'COMPLETED', completed_at = $1, updated_at = $1
        WHERE status IN ('PENDING', 'IN_PROGRESS') AND created_at < $2
        "#,
    )
    .bind(now)
    .bind(expiry_cutoff(now))
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
