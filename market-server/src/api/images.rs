//! Product image API handlers
//!
//! Payloads are stored in-row: base64 (size-checked after decoding) or a
//! URL. Primary-image exclusivity is enforced transactionally in the db
//! layer. Writes are admin-gated; reads are public.

use axum::Json;
use axum::extract::{Path, State};

use shared::error::ApiResponse;
use shared::models::{Image, ImageCreate, ImageUpdate};

use super::ApiResult;
use crate::auth::AdminUser;
use crate::db;
use crate::state::AppState;
use crate::validation;

/// POST /api/images
pub async fn create(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<ImageCreate>,
) -> ApiResult<Image> {
    validation::validate_image_content_type(&req.content_type)?;
    validation::validate_image_data(&req.data)?;

    let image = db::images::create(&state.pool, &req).await?;

    tracing::info!(image_id = image.id, product_id = image.product_id, "Image created");

    Ok(Json(image))
}

/// GET /api/images/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Image> {
    Ok(Json(db::images::get(&state.pool, id).await?))
}

/// GET /api/images/product/{product_id} — active images, primary first
pub async fn list_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<Vec<Image>> {
    Ok(Json(
        db::images::list_by_product(&state.pool, product_id).await?,
    ))
}

/// PATCH /api/images/{id}
pub async fn update(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<ImageUpdate>,
) -> ApiResult<Image> {
    if let Some(content_type) = &req.content_type {
        validation::validate_image_content_type(content_type)?;
    }
    if let Some(data) = &req.data {
        validation::validate_image_data(data)?;
    }

    Ok(Json(db::images::update(&state.pool, id, &req).await?))
}

/// PATCH /api/images/{id}/primary — make this the product's only primary
pub async fn set_primary(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Image> {
    Ok(Json(db::images::set_primary(&state.pool, id).await?))
}

/// DELETE /api/images/{id}
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    db::images::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/images/{id}/soft
pub async fn soft_delete(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    db::images::soft_delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}
