//! Advertisement database operations

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Advertisement, AdvertisementCreate, AdvertisementUpdate, Page};
use shared::util::now_millis;
use sqlx::PgPool;

use super::query_builder::QueryBuilder;
use crate::error::ServiceResult;

/// List filters; every field optional.
#[derive(Debug, Default)]
pub struct AdvertisementFilter {
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub include_inactive: bool,
}

pub async fn list(
    pool: &PgPool,
    filter: &AdvertisementFilter,
    page: i32,
    per_page: i32,
) -> Result<Page<Advertisement>, sqlx::Error> {
    let mut qb = QueryBuilder::new();
    if !filter.include_inactive {
        qb.eq_bool("is_active", true);
    }
    if let Some(category_id) = filter.category_id {
        qb.eq_i64("category_id", category_id);
    }
    if let Some(author_id) = filter.author_id {
        qb.eq_i64("author_id", author_id);
    }
    if let Some(term) = &filter.search {
        qb.search(&["title", "description"], term);
    }
    if let Some(min) = filter.min_price {
        qb.min_decimal("price", min);
    }
    if let Some(max) = filter.max_price {
        qb.max_decimal("price", max);
    }

    let where_clause = qb.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM advertisements{where_clause}");
    let total: i64 = qb
        .apply_bindings_scalar(sqlx::query_scalar(&count_sql))
        .fetch_one(pool)
        .await?;

    let offset = (page as i64 - 1) * per_page as i64;
    let page_sql = format!(
        "SELECT * FROM advertisements{where_clause} ORDER BY created_at DESC, id DESC LIMIT {per_page} OFFSET {offset}"
    );
    let items: Vec<Advertisement> = qb
        .apply_bindings(sqlx::query_as(&page_sql))
        .fetch_all(pool)
        .await?;

    Ok(Page::new(items, total, page, per_page))
}

/// Plain row fetch; does not touch the view counter.
pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Advertisement>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM advertisements WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Single-item read: bump `views` and return the updated row in one
/// statement, so concurrent reads never lose an increment.
pub async fn get_and_bump_views(pool: &PgPool, id: i64) -> ServiceResult<Advertisement> {
    let ad: Option<Advertisement> = sqlx::query_as(
        "UPDATE advertisements SET views = views + 1 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let ad = ad.ok_or(AppError::new(ErrorCode::AdvertisementNotFound))?;
    Ok(ad)
}

pub async fn create(
    pool: &PgPool,
    author_id: i64,
    data: &AdvertisementCreate,
) -> ServiceResult<Advertisement> {
    if let Some(category_id) = data.category_id {
        check_category(pool, category_id).await?;
    }

    let now = now_millis();
    let ad = sqlx::query_as(
        r#"
        INSERT INTO advertisements (title, description, price, author_id, category_id, views, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 0, TRUE, $6, $6)
        RETURNING *
        "#,
    )
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(data.price)
    .bind(author_id)
    .bind(data.category_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(ad)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &AdvertisementUpdate,
) -> ServiceResult<Advertisement> {
    if let Some(category_id) = data.category_id {
        check_category(pool, category_id).await?;
    }

    let title = data.title.as_deref().map(str::trim);
    let updated: Option<Advertisement> = sqlx::query_as(
        r#"
        UPDATE advertisements SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            category_id = COALESCE($4, category_id),
            is_active = COALESCE($5, is_active),
            updated_at = $6
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let ad = updated.ok_or(AppError::new(ErrorCode::AdvertisementNotFound))?;
    Ok(ad)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM advertisements WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::AdvertisementNotFound).into());
    }
    Ok(())
}

pub async fn soft_delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows =
        sqlx::query("UPDATE advertisements SET is_active = FALSE, updated_at = $1 WHERE id = $2")
            .bind(now_millis())
            .bind(id)
            .execute(pool)
            .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::AdvertisementNotFound).into());
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
