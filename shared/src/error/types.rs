//! `AppError` and the wire envelope returned on failures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error carried through handlers and rendered as the JSON error body.
///
/// Every failure path in the backend ends up here: the [`ErrorCode`]
/// fixes the numeric code and HTTP status, `message` defaults to the
/// code's canonical text but can be overridden, and `details` carries
/// structured context (offending product id, requested vs available
/// stock, rejected field) for clients that want more than the message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's canonical message.
    pub fn new(code: ErrorCode) -> Self {
        let message = code.message().to_string();
        Self { code, message, details: None }
    }

    /// Error with a message specific to this occurrence.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        let mut err = Self::new(code);
        err.message = message.into();
        err
    }

    /// Attach one key/value pair of structured context.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let details = self.details.get_or_insert_default();
        details.insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // Shorthands for the codes raised from more than one place.

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{resource} not found"))
            .with_detail("resource", resource)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    pub fn not_resource_owner() -> Self {
        Self::new(ErrorCode::NotResourceOwner)
    }
}

/// Body of every non-payload response.
///
/// Successful reads and writes return the resource itself; this envelope
/// covers the rest: acknowledgements (`code` 0) and errors (`code` equal
/// to the [`ErrorCode`], `details` present when the error carries any).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Acknowledgement for deletes, logout and similar bodyless writes.
    pub fn ok() -> Self {
        Self {
            code: 0,
            message: "OK".to_string(),
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        let AppError { code, message, details } = err.clone();
        Self { code: code.code(), message, details }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use super::category::ErrorCategory;
        use axum::Json;

        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error returned to client");
        }

        (self.http_status(), Json(ApiResponse::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_canonical_message() {
        let err = AppError::new(ErrorCode::CategoryCycle);
        assert_eq!(err.code, ErrorCode::CategoryCycle);
        assert_eq!(err.message, ErrorCode::CategoryCycle.message());
        assert!(err.details.is_none());
    }

    #[test]
    fn test_with_message_overrides_canonical() {
        let err =
            AppError::with_message(ErrorCode::OrderStatusInvalid, "Cannot cancel a SHIPPED order");
        assert_eq!(err.code, ErrorCode::OrderStatusInvalid);
        assert_eq!(err.message, "Cannot cancel a SHIPPED order");
    }

    #[test]
    fn test_stock_details_accumulate() {
        let err = AppError::new(ErrorCode::ProductOutOfStock)
            .with_detail("product_id", 42_i64)
            .with_detail("requested", 3)
            .with_detail("available", 1);

        let details = err.details.unwrap();
        assert_eq!(details.get("product_id").unwrap(), 42);
        assert_eq!(details.get("requested").unwrap(), 3);
        assert_eq!(details.get("available").unwrap(), 1);
    }

    #[test]
    fn test_http_status_per_family() {
        assert_eq!(
            AppError::not_found("Advertisement").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::unauthorized().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::not_resource_owner().http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::new(ErrorCode::CategoryNameExists).http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::new(ErrorCode::ProductOutOfStock).http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_names_the_resource() {
        let err = AppError::not_found("Category");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Category not found");
        assert_eq!(err.details.unwrap().get("resource").unwrap(), "Category");
    }

    #[test]
    fn test_display_is_the_message() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 77 not found");
        assert_eq!(format!("{}", err), "Order 77 not found");
    }

    #[test]
    fn test_ack_shape() {
        let body = ApiResponse::ok();
        assert_eq!(body.code, 0);
        assert_eq!(body.message, "OK");

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"code":0,"message":"OK"}"#);
    }

    #[test]
    fn test_error_body_carries_code_and_details() {
        let err = AppError::with_message(ErrorCode::CategoryNameExists, "Name already in use")
            .with_detail("name", "Electronics");
        let body = ApiResponse::error(&err);

        assert_eq!(body.code, ErrorCode::CategoryNameExists.code());
        assert_eq!(body.message, "Name already in use");
        assert!(body.details.is_some());
    }

    #[test]
    fn test_error_body_without_details_omits_the_field() {
        let body = ApiResponse::error(&AppError::invalid_credentials());
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
        assert!(json.contains("\"code\":1002"));
    }

    #[test]
    fn test_envelope_roundtrip() {
        let json = r#"{"code":4005,"message":"Order cannot be modified"}"#;
        let body: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.code, 4005);
        assert!(body.details.is_none());
    }
}
