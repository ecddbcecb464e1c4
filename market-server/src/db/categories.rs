//! Category database operations
//!
//! Tree walks (path, descendants, stats) live in `crate::hierarchy` and
//! operate on one snapshot loaded here; this module owns the SQL and the
//! write-side guards (name uniqueness, parent checks, cycle prevention).

use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

use crate::error::ServiceResult;
use crate::hierarchy;

/// One snapshot of all active categories, ordered by id.
pub async fn load_active(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE is_active = TRUE ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Category> {
    let category = find(pool, id)
        .await?
        .ok_or(AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(category)
}

/// Categories without a parent, active only.
pub async fn roots(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM categories WHERE parent_id IS NULL AND is_active = TRUE ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Direct children of a category, active only.
pub async fn subcategories(pool: &PgPool, id: i64) -> ServiceResult<Vec<Category>> {
    get(pool, id).await?;
    let children = sqlx::query_as(
        "SELECT * FROM categories WHERE parent_id = $1 AND is_active = TRUE ORDER BY name",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(children)
}

/// Active product count per category, one grouped query (stats).
pub async fn product_counts(pool: &PgPool) -> Result<Vec<(i64, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT category_id, COUNT(*) FROM products WHERE is_active = TRUE GROUP BY category_id",
    )
    .fetch_all(pool)
    .await
}

pub async fn create(pool: &PgPool, data: &CategoryCreate) -> ServiceResult<Category> {
    let name = data.name.trim();

    let name_taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE LOWER(name) = LOWER($1) AND is_active = TRUE)",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;
    if name_taken {
        return Err(AppError::new(ErrorCode::CategoryNameExists).into());
    }

    if let Some(parent_id) = data.parent_id {
        check_parent(pool, parent_id).await?;
    }

    let now = now_millis();
    let category = sqlx::query_as(
        r#"
        INSERT INTO categories (name, description, parent_id, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, TRUE, $4, $4)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(&data.description)
    .bind(data.parent_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

pub async fn update(pool: &PgPool, id: i64, data: &CategoryUpdate) -> ServiceResult<Category> {
    let mut tx = pool.begin().await?;

    let current: Category = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::new(ErrorCode::CategoryNotFound))?;

    if let Some(name) = &data.name {
        let name = name.trim();
        if !name.eq_ignore_ascii_case(&current.name) {
            let name_taken: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE LOWER(name) = LOWER($1) AND is_active = TRUE AND id <> $2)",
            )
            .bind(name)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if name_taken {
                return Err(AppError::new(ErrorCode::CategoryNameExists).into());
            }
        }
    }

    // parent_id: absent = unchanged, null = move to root, value = reparent
    if let Some(Some(new_parent)) = data.parent_id {
        if new_parent == id {
            return Err(AppError::new(ErrorCode::CategoryCycle).into());
        }

        let parent_active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM categories WHERE id = $1")
                .bind(new_parent)
                .fetch_optional(&mut *tx)
                .await?;
        match parent_active {
            Some(true) => {}
            Some(false) => return Err(AppError::new(ErrorCode::CategoryInactive).into()),
            None => return Err(AppError::new(ErrorCode::CategoryParentNotFound).into()),
        }

        // Reject any descendant of this category as its new parent.
        // The walk covers inactive rows too; a hidden path must not
        // smuggle a cycle in.
        let snapshot: Vec<Category> = sqlx::query_as("SELECT * FROM categories")
            .fetch_all(&mut *tx)
            .await?;
        if hierarchy::is_descendant(&snapshot, new_parent, id) {
            return Err(AppError::new(ErrorCode::CategoryCycle).into());
        }
    }

    let now = now_millis();
    let name = data.name.as_deref().map(str::trim);
    let updated: Category = if let Some(new_parent) = data.parent_id {
        sqlx::query_as(
            r#"
            UPDATE categories SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                is_active = COALESCE($3, is_active),
                parent_id = $4,
                updated_at = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(&data.description)
        .bind(data.is_active)
        .bind(new_parent)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?
    } else {
        sqlx::query_as(
            r#"
            UPDATE categories SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                is_active = COALESCE($3, is_active),
                updated_at = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(&data.description)
        .bind(data.is_active)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?
    };

    tx.commit().await?;
    Ok(updated)
}

/// Hard delete. Rejected while products or child categories still
/// reference the row (the FKs would reject it anyway; this returns the
/// proper error code instead of a constraint violation).
pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let product_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if product_count > 0 {
        return Err(AppError::new(ErrorCode::CategoryHasProducts).into());
    }

    let child_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if child_count > 0 {
        return Err(AppError::new(ErrorCode::CategoryHasChildren).into());
    }

    let rows = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::CategoryNotFound).into());
    }

    tx.commit().await?;
    Ok(())
}

pub async fn soft_delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("UPDATE categories SET is_active = FALSE, updated_at = $1 WHERE id = $2")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::CategoryNotFound).into());
    }
    Ok(())
}

async fn check_parent(pool: &PgPool, parent_id: i64) -> ServiceResult<()> {
    let parent_active: Option<bool> =
        sqlx::query_scalar("SELECT is_active FROM categories WHERE id = $1")
            .bind(parent_id)
            .fetch_optional(pool)
            .await?;
    match parent_active {
        Some(true) => Ok(()),
        Some(false) => Err(AppError::new(ErrorCode::CategoryInactive).into()),
        None => Err(AppError::new(ErrorCode::CategoryParentNotFound).into()),
    }
}
