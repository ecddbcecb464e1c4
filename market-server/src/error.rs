//! Service-layer error type
//!
//! The db layer mixes SQL failures with business-rule rejections; wrapping
//! both in `ServiceError` lets a transaction body use `?` on either and
//! lets the handler convert the result straight into a response.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Query or connection failure. Logged server-side and masked as a
    /// generic DatabaseError so SQL details never reach the client.
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    /// Business-rule rejection, forwarded to the client unchanged.
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(err) => err,
            ServiceError::Db(err) => {
                tracing::error!(error = %err, "Unhandled database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
