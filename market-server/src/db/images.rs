//! Product image database operations
//!
//! Primary-image exclusivity: every write that sets `is_primary = TRUE`
//! clears the flag on all sibling images first, inside one transaction.
//! A partial unique index on (product_id) WHERE is_primary backs this.

use shared::error::{AppError, ErrorCode};
use shared::models::{Image, ImageCreate, ImageUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

use crate::error::ServiceResult;

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Image>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM images WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Image> {
    let image = find(pool, id)
        .await?
        .ok_or(AppError::new(ErrorCode::ImageNotFound))?;
    Ok(image)
}

/// All active images of a product, primary first.
pub async fn list_by_product(pool: &PgPool, product_id: i64) -> ServiceResult<Vec<Image>> {
    let product_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(product_id)
            .fetch_one(pool)
            .await?;
    if !product_exists {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }

    let images = sqlx::query_as(
        r#"
        SELECT * FROM images
        WHERE product_id = $1 AND is_active = TRUE
        ORDER BY is_primary DESC, sort_order, id
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}

pub async fn create(pool: &PgPool, data: &ImageCreate) -> ServiceResult<Image> {
    let product_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(data.product_id)
            .fetch_one(pool)
            .await?;
    if !product_exists {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }

    let is_primary = data.is_primary.unwrap_or(false);
    let sort_order = data.sort_order.unwrap_or(0);
    let now = now_millis();

    let mut tx = pool.begin().await?;

    if is_primary {
        sqlx::query("UPDATE images SET is_primary = FALSE WHERE product_id = $1 AND is_primary")
            .bind(data.product_id)
            .execute(&mut *tx)
            .await?;
    }

    let image = sqlx::query_as(
        r#"
        INSERT INTO images (product_id, data, content_type, is_primary, sort_order, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
        RETURNING *
        "#,
    )
    .bind(data.product_id)
    .bind(&data.data)
    .bind(&data.content_type)
    .bind(is_primary)
    .bind(sort_order)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(image)
}

pub async fn update(pool: &PgPool, id: i64, data: &ImageUpdate) -> ServiceResult<Image> {
    let mut tx = pool.begin().await?;

    let current: Image = sqlx::query_as("SELECT * FROM images WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::new(ErrorCode::ImageNotFound))?;

    if data.is_primary == Some(true) {
        sqlx::query(
            "UPDATE images SET is_primary = FALSE WHERE product_id = $1 AND is_primary AND id <> $2",
        )
        .bind(current.product_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    let image = sqlx::query_as(
        r#"
        UPDATE images SET
            data = COALESCE($1, data),
            content_type = COALESCE($2, content_type),
            is_primary = COALESCE($3, is_primary),
            sort_order = COALESCE($4, sort_order),
            is_active = COALESCE($5, is_active),
            updated_at = $6
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(&data.data)
    .bind(&data.content_type)
    .bind(data.is_primary)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(image)
}

/// Promote one image to primary, demoting its siblings in the same
/// transaction.
pub async fn set_primary(pool: &PgPool, id: i64) -> ServiceResult<Image> {
    let mut tx = pool.begin().await?;

    let current: Image = sqlx::query_as("SELECT * FROM images WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::new(ErrorCode::ImageNotFound))?;

    sqlx::query(
        "UPDATE images SET is_primary = FALSE WHERE product_id = $1 AND is_primary AND id <> $2",
    )
    .bind(current.product_id)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let image = sqlx::query_as(
        "UPDATE images SET is_primary = TRUE, updated_at = $1 WHERE id = $2 RETURNING *",
    )
    .bind(now_millis())
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(image)
}

/// Hard delete. Deleting the primary image leaves the product without a
/// primary; no auto-promotion.
pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM images WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ImageNotFound).into());
    }
    Ok(())
}

pub async fn soft_delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("UPDATE images SET is_active = FALSE, updated_at = $1 WHERE id = $2")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ImageNotFound).into());
    }
    Ok(())
}
