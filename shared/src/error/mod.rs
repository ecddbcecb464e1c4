//! Error codes and the JSON error envelope
//!
//! [`ErrorCode`] assigns every failure a stable number (see its module
//! doc for the range layout), [`AppError`] pairs a code with a message
//! and optional structured details, and [`ApiResponse`] is the wire
//! shape clients see.
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::validation("Price must be positive")
//!     .with_detail("field", "price");
//!
//! let body = ApiResponse::error(&err);
//! assert_eq!(body.code, ErrorCode::ValidationFailed.code());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError};
