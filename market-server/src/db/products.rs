//! Product database operations

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Page, Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

use super::query_builder::QueryBuilder;
use crate::error::ServiceResult;

/// List filters; every field optional.
#[derive(Debug, Default)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: bool,
    pub include_inactive: bool,
}

pub async fn list(
    pool: &PgPool,
    filter: &ProductFilter,
    page: i32,
    per_page: i32,
) -> Result<Page<Product>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    if !filter.include_inactive {
        qb.eq_bool("is_active", true);
    }
    if let Some(category_id) = filter.category_id {
        qb.eq_i64("category_id", category_id);
    }
    if let Some(term) = &filter.search {
        qb.search(&["name", "description"], term);
    }
    if let Some(min) = filter.min_price {
        qb.min_decimal("price", min);
    }
    if let Some(max) = filter.max_price {
        qb.max_decimal("price", max);
    }
    if filter.in_stock {
        qb.condition("stock > 0");
    }

    let where_clause = qb.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM products{where_clause}");
    let total: i64 = qb
        .apply_bindings_scalar(sqlx::query_scalar(&count_sql))
        .fetch_one(pool)
        .await?;

    let offset = (page as i64 - 1) * per_page as i64;
    let page_sql = format!(
        "SELECT * FROM products{where_clause} ORDER BY created_at DESC, id DESC LIMIT {per_page} OFFSET {offset}"
    );
    let items: Vec<Product> = qb
        .apply_bindings(sqlx::query_as(&page_sql))
        .fetch_all(pool)
        .await?;

    Ok(Page::new(items, total, page, per_page))
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Product> {
    let product = find(pool, id)
        .await?
        .ok_or(AppError::new(ErrorCode::ProductNotFound))?;
    Ok(product)
}

pub async fn create(pool: &PgPool, data: &ProductCreate) -> ServiceResult<Product> {
    check_category(pool, data.category_id).await?;

    let now = now_millis();
    let product = sqlx::query_as(
        r#"
        INSERT INTO products (name, description, price, stock, category_id, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
        RETURNING *
        "#,
    )
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.category_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update(pool: &PgPool, id: i64, data: &ProductUpdate) -> ServiceResult<Product> {
    if let Some(category_id) = data.category_id {
        check_category(pool, category_id).await?;
    }

    let name = data.name.as_deref().map(str::trim);
    let updated: Option<Product> = sqlx::query_as(
        r#"
        UPDATE products SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            stock = COALESCE($4, stock),
            category_id = COALESCE($5, category_id),
            is_active = COALESCE($6, is_active),
            updated_at = $7
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.category_id)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let product = updated.ok_or(AppError::new(ErrorCode::ProductNotFound))?;
    Ok(product)
}

/// Hard delete; images cascade. Rejected while order items still
/// reference the product (orders keep their price snapshot, the row
/// itself must stay).
pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let referenced: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM order_items WHERE product_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if referenced {
        return Err(AppError::new(ErrorCode::ProductHasOrderItems).into());
    }

    let rows = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    Ok(())
}

pub async fn soft_delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("UPDATE products SET is_active = FALSE, updated_at = $1 WHERE id = $2")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }
    Ok(())
}

async fn check_category(pool: &PgPool, category_id: i64) -> ServiceResult<()> {
    let active: Option<bool> = sqlx::query_scalar("SELECT is_active FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(pool)
        .await?;
    match active {
        Some(true) => Ok(()),
        Some(false) => Err(AppError::new(ErrorCode::CategoryInactive).into()),
        None => Err(AppError::new(ErrorCode::CategoryNotFound).into()),
    }
}
