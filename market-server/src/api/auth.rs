//! Authentication API handlers
//!
//! POST /api/auth/register — create account, returns profile + token pair
//! POST /api/auth/login    — verify credentials, returns token pair
//! POST /api/auth/refresh  — rotate the refresh token
//! POST /api/auth/logout   — revoke all refresh tokens of the current user
//! GET  /api/auth/me       — current profile

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::UserProfile;

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};
use crate::validation;

// ── Request / Response types ──

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair issued on register, login and refresh
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: UserProfile,
}

// ── POST /api/auth/register ──

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();
    let username = req.username.trim().to_string();

    validation::validate_email(&email)?;
    validation::validate_required_text(&username, "username", validation::MAX_USERNAME_LEN)?;
    validation::validate_password(&req.password)?;

    if db::users::email_exists(&state.pool, &email)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::EmailExists));
    }
    if db::users::username_exists(&state.pool, &username)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::UsernameExists));
    }

    // The configured bootstrap email becomes the admin account
    let role = if state.admin_email.as_deref() == Some(email.as_str()) {
        "admin"
    } else {
        "user"
    };

    let hashed = hash_password(&req.password).map_err(internal)?;
    let user = db::users::create(&state.pool, &email, &username, &hashed, role)
        .await
        .map_err(internal)?;

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User registered");

    issue_tokens(&state, &user).await
}

// ── POST /api/auth/login ──

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(internal)?
        .ok_or_else(AppError::invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }
    if !verify_password(&req.password, &user.hashed_password) {
        return Err(AppError::invalid_credentials());
    }

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    issue_tokens(&state, &user).await
}

// ── POST /api/auth/refresh ──

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<AuthResponse> {
    let (user_id, new_refresh_token) = db::tokens::rotate(&state.pool, &req.refresh_token)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RefreshTokenInvalid))?;

    let user = db::users::find_by_id(&state.pool, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RefreshTokenInvalid))?;

    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let access_token = state
        .jwt
        .generate_token(user.id, &user.username, &user.role)
        .map_err(internal)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token: new_refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.config.expiration_minutes * 60,
        user: user.profile(),
    }))
}

// ── POST /api/auth/logout ──

pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<ApiResponse> {
    db::tokens::revoke_all(&state.pool, user.id)
        .await
        .map_err(internal)?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged out");

    Ok(Json(ApiResponse::ok()))
}

// ── GET /api/auth/me ──

pub async fn me(State(state): State<AppState>, user: CurrentUser) -> ApiResult<UserProfile> {
    let user = db::users::find_by_id(&state.pool, user.id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(Json(user.profile()))
}

// ── Helpers ──

/// Issue a fresh refresh token (revoking prior ones) plus an access token.
async fn issue_tokens(state: &AppState, user: &db::users::User) -> ApiResult<AuthResponse> {
    let refresh_token = db::tokens::issue(&state.pool, user.id)
        .await
        .map_err(internal)?;

    let access_token = state
        .jwt
        .generate_token(user.id, &user.username, &user.role)
        .map_err(internal)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.config.expiration_minutes * 60,
        user: user.profile(),
    }))
}

fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Auth error: {e}");
    AppError::new(ErrorCode::InternalError)
}
