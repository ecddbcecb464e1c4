//! Advertisement API handlers
//!
//! User-posted listings, distinct from the admin-managed catalog. Any
//! authenticated user can create; edits and deletes are restricted to the
//! author or an admin. Reads are public; fetching a single advertisement
//! bumps its view counter.

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;

use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Advertisement, AdvertisementCreate, AdvertisementUpdate, Page};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::db::advertisements::AdvertisementFilter;
use crate::state::AppState;
use crate::validation;

// ── Query parameters ──

#[derive(Debug, Deserialize)]
pub struct AdvertisementListQuery {
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub include_inactive: Option<bool>,
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

// ── Handlers ──

/// POST /api/advertisements
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<AdvertisementCreate>,
) -> ApiResult<Advertisement> {
    validation::validate_required_text(&req.title, "title", validation::MAX_TITLE_LEN)?;
    validation::validate_optional_text(
        &req.description,
        "description",
        validation::MAX_DESCRIPTION_LEN,
    )?;
    validate_price(req.price)?;

    let ad = db::advertisements::create(&state.pool, user.id, &req).await?;

    tracing::info!(advertisement_id = ad.id, author_id = user.id, "Advertisement created");

    Ok(Json(ad))
}

/// GET /api/advertisements
pub async fn list(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(q): Query<AdvertisementListQuery>,
) -> ApiResult<Page<Advertisement>> {
    let page = q.page.unwrap_or(1).max(1);
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100);

    // Inactive listings are visible to admins and to authors browsing
    // their own advertisements
    let include_inactive = q.include_inactive.unwrap_or(false)
        && user
            .as_ref()
            .is_some_and(|u| u.is_admin() || q.author_id == Some(u.id));

    let filter = AdvertisementFilter {
        category_id: q.category_id,
        author_id: q.author_id,
        search: q.search,
        min_price: q.min_price,
        max_price: q.max_price,
        include_inactive,
    };

    let ads = db::advertisements::list(&state.pool, &filter, page, per_page)
        .await
        .map_err(internal)?;
    Ok(Json(ads))
}

/// GET /api/advertisements/{id} — bumps the view counter atomically
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Advertisement> {
    Ok(Json(
        db::advertisements::get_and_bump_views(&state.pool, id).await?,
    ))
}

/// PATCH /api/advertisements/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<AdvertisementUpdate>,
) -> ApiResult<Advertisement> {
    if let Some(title) = &req.title {
        validation::validate_required_text(title, "title", validation::MAX_TITLE_LEN)?;
    }
    validation::validate_optional_text(
        &req.description,
        "description",
        validation::MAX_DESCRIPTION_LEN,
    )?;
    if let Some(price) = req.price {
        validate_price(price)?;
    }

    check_owner(&state, id, &user).await?;

    Ok(Json(db::advertisements::update(&state.pool, id, &req).await?))
}

/// DELETE /api/advertisements/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    check_owner(&state, id, &user).await?;
    db::advertisements::delete(&state.pool, id).await?;

    tracing::info!(advertisement_id = id, user_id = user.id, "Advertisement deleted");

    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/advertisements/{id}/soft
pub async fn soft_delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    check_owner(&state, id, &user).await?;
    db::advertisements::soft_delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

// ── Helpers ──

/// Reject unless the advertisement exists and the caller is its author or
/// an admin.
async fn check_owner(state: &AppState, id: i64, user: &CurrentUser) -> Result<(), AppError> {
    let ad = db::advertisements::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::AdvertisementNotFound))?;

    if ad.author_id != user.id && !user.is_admin() {
        return Err(AppError::not_resource_owner());
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice));
    }
    Ok(())
}

fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Advertisement query error: {e}");
    AppError::new(ErrorCode::InternalError)
}
