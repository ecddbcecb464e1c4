//! API routes for market-server
//!
//! One handler module per resource; routes are assembled here. Auth is
//! enforced per handler through the `CurrentUser` / `AdminUser` extractors,
//! so public and protected routes can share one router.

pub mod advertisements;
pub mod auth;
pub mod categories;
pub mod health;
pub mod images;
pub mod messages;
pub mod orders;
pub mod products;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use http::HeaderValue;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use shared::error::AppError;

use crate::config::Config;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState, config: &Config) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me));

    let category_routes = Router::new()
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route("/api/categories/root", get(categories::roots))
        .route("/api/categories/tree", get(categories::tree))
        .route("/api/categories/stats", get(categories::stats))
        .route(
            "/api/categories/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route("/api/categories/{id}/soft", delete(categories::soft_delete))
        .route("/api/categories/{id}/path", get(categories::path))
        .route(
            "/api/categories/{id}/descendants",
            get(categories::descendants),
        )
        .route("/api/categories/{id}/level", get(categories::level))
        .route("/api/categories/{id}/is-leaf", get(categories::is_leaf))
        .route(
            "/api/categories/{id}/subcategories",
            get(categories::subcategories),
        );

    let product_routes = Router::new()
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/{id}",
            get(products::get)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/api/products/{id}/soft", delete(products::soft_delete));

    // Base64 image payloads need a larger body limit
    let image_routes = Router::new()
        .route("/api/images", post(images::create))
        .route(
            "/api/images/{id}",
            get(images::get)
                .patch(images::update)
                .delete(images::delete),
        )
        .route("/api/images/{id}/primary", patch(images::set_primary))
        .route("/api/images/{id}/soft", delete(images::soft_delete))
        .route(
            "/api/images/product/{product_id}",
            get(images::list_by_product),
        )
        .layer(DefaultBodyLimit::max(5 * 1024 * 1024)); // 5MB

    let advertisement_routes = Router::new()
        .route(
            "/api/advertisements",
            get(advertisements::list).post(advertisements::create),
        )
        .route(
            "/api/advertisements/{id}",
            get(advertisements::get)
                .patch(advertisements::update)
                .delete(advertisements::delete),
        )
        .route(
            "/api/advertisements/{id}/soft",
            delete(advertisements::soft_delete),
        );

    let message_routes = Router::new()
        .route("/api/messages", get(messages::list).post(messages::send))
        .route("/api/messages/conversations", get(messages::conversations))
        .route(
            "/api/messages/{id}",
            get(messages::get).delete(messages::delete),
        )
        .route("/api/messages/{id}/read", patch(messages::mark_read));

    let order_routes = Router::new()
        .route("/api/orders", get(orders::list).post(orders::create))
        .route(
            "/api/orders/{id}",
            get(orders::get).delete(orders::delete),
        )
        .route("/api/orders/{id}/status", patch(orders::update_status));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth_routes)
        .merge(category_routes)
        .merge(product_routes)
        .merge(image_routes)
        .merge(advertisement_routes)
        .merge(message_routes)
        .merge(order_routes)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB default
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(ConcurrencyLimitLayer::new(256))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS from config: a comma-separated origin list, or permissive when unset.
fn cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(list) => {
            let origins: Vec<HeaderValue> = list
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}
