//! Numeric error codes shared by the server and its clients
//!
//! Codes are grouped by range so clients can react per family without
//! matching every value:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Category errors
//! - 4xxx: Order errors
//! - 5xxx: Messaging errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error code carried in every error response.
///
/// Values are frozen once shipped; new codes append to their family.
/// Serialized as the bare u16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidRequest = 5,
    InvalidFormat = 6,
    RequiredField = 7,
    /// Numeric field outside its allowed range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    NotAuthenticated = 1001,
    InvalidCredentials = 1002,
    TokenExpired = 1003,
    TokenInvalid = 1004,
    /// Refresh token was revoked, rotated or expired
    RefreshTokenInvalid = 1005,
    AccountDisabled = 1006,
    EmailExists = 1007,
    UsernameExists = 1008,
    PasswordTooShort = 1009,
    EmailInvalid = 1010,

    // ==================== 2xxx: Permission ====================
    PermissionDenied = 2001,
    AdminRequired = 2002,
    /// Caller is neither the owner of the resource nor an admin
    NotResourceOwner = 2003,

    // ==================== 3xxx: Category ====================
    CategoryNotFound = 3001,
    CategoryNameExists = 3002,
    /// Hard delete blocked while products reference the category
    CategoryHasProducts = 3003,
    /// Hard delete blocked while child categories exist
    CategoryHasChildren = 3004,
    CategoryParentNotFound = 3005,
    /// Parent assignment would make the category its own ancestor
    CategoryCycle = 3006,
    CategoryInactive = 3007,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderEmpty = 4002,
    OrderInvalidQuantity = 4003,
    /// The same product appears in more than one line item
    OrderDuplicateProduct = 4004,
    OrderStatusInvalid = 4005,
    OrderAlreadyCompleted = 4006,
    /// Only PENDING orders can be cancelled
    OrderNotPending = 4007,

    // ==================== 5xxx: Messaging ====================
    MessageNotFound = 5001,
    ReceiverNotFound = 5002,
    MessageToSelf = 5003,
    /// Reply target belongs to a different conversation
    MessageParentInvalid = 5004,

    // 6xxx catalog: 60xx products, 62xx advertisements, 65xx uploads.

    // ==================== 60xx: Product ====================
    ProductNotFound = 6001,
    ProductInvalidPrice = 6002,
    ProductOutOfStock = 6003,
    ProductInvalidStock = 6004,
    /// Hard delete blocked while order items reference the product
    ProductHasOrderItems = 6005,

    // ==================== 62xx: Advertisement ====================
    AdvertisementNotFound = 6201,

    // ==================== 65xx: File Upload ====================
    /// Decoded payload exceeds the image byte limit
    FileTooLarge = 6501,
    UnsupportedFileFormat = 6502,
    /// Payload is not valid base64 image data
    InvalidImageFile = 6503,
    ImageNotFound = 6504,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
    ConfigError = 9003,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Canonical English message for the code.
    ///
    /// Handlers may override it per occurrence; this is the fallback
    /// clients see when they don't.
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::RefreshTokenInvalid => "Refresh token is invalid or expired",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::EmailExists => "Email is already registered",
            ErrorCode::UsernameExists => "Username is already taken",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::EmailInvalid => "Email address is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::NotResourceOwner => "You do not own this resource",

            // Category
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CategoryHasProducts => "Category has associated products",
            ErrorCode::CategoryHasChildren => "Category has child categories",
            ErrorCode::CategoryParentNotFound => "Parent category not found",
            ErrorCode::CategoryCycle => "Category cannot be its own ancestor",
            ErrorCode::CategoryInactive => "Category is inactive",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderInvalidQuantity => "Order item quantity must be positive",
            ErrorCode::OrderDuplicateProduct => "Order contains duplicate products",
            ErrorCode::OrderStatusInvalid => "Order status transition is not allowed",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderNotPending => "Order is no longer pending",

            // Messaging
            ErrorCode::MessageNotFound => "Message not found",
            ErrorCode::ReceiverNotFound => "Receiver not found",
            ErrorCode::MessageToSelf => "Cannot send a message to yourself",
            ErrorCode::MessageParentInvalid => "Parent message does not belong to this conversation",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::ProductInvalidStock => "Product has invalid stock quantity",
            ErrorCode::ProductHasOrderItems => "Product is referenced by existing orders",
            ErrorCode::AdvertisementNotFound => "Advertisement not found",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::ImageNotFound => "Image not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Returned when a u16 does not map to any known code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::RefreshTokenInvalid),
            1006 => Ok(ErrorCode::AccountDisabled),
            1007 => Ok(ErrorCode::EmailExists),
            1008 => Ok(ErrorCode::UsernameExists),
            1009 => Ok(ErrorCode::PasswordTooShort),
            1010 => Ok(ErrorCode::EmailInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::NotResourceOwner),

            // Category
            3001 => Ok(ErrorCode::CategoryNotFound),
            3002 => Ok(ErrorCode::CategoryNameExists),
            3003 => Ok(ErrorCode::CategoryHasProducts),
            3004 => Ok(ErrorCode::CategoryHasChildren),
            3005 => Ok(ErrorCode::CategoryParentNotFound),
            3006 => Ok(ErrorCode::CategoryCycle),
            3007 => Ok(ErrorCode::CategoryInactive),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderInvalidQuantity),
            4004 => Ok(ErrorCode::OrderDuplicateProduct),
            4005 => Ok(ErrorCode::OrderStatusInvalid),
            4006 => Ok(ErrorCode::OrderAlreadyCompleted),
            4007 => Ok(ErrorCode::OrderNotPending),

            // Messaging
            5001 => Ok(ErrorCode::MessageNotFound),
            5002 => Ok(ErrorCode::ReceiverNotFound),
            5003 => Ok(ErrorCode::MessageToSelf),
            5004 => Ok(ErrorCode::MessageParentInvalid),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6004 => Ok(ErrorCode::ProductInvalidStock),
            6005 => Ok(ErrorCode::ProductHasOrderItems),
            6201 => Ok(ErrorCode::AdvertisementNotFound),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::ImageNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One pinned value per family; the exhaustive mapping is exercised
    // by test_every_code_survives_u16_roundtrip below.
    #[test]
    fn test_family_anchor_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2002);
        assert_eq!(ErrorCode::CategoryCycle.code(), 3006);
        assert_eq!(ErrorCode::OrderNotPending.code(), 4007);
        assert_eq!(ErrorCode::MessageToSelf.code(), 5003);
        assert_eq!(ErrorCode::ProductOutOfStock.code(), 6003);
        assert_eq!(ErrorCode::AdvertisementNotFound.code(), 6201);
        assert_eq!(ErrorCode::FileTooLarge.code(), 6501);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    const ALL_CODES: &[ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidFormat,
        ErrorCode::RequiredField,
        ErrorCode::ValueOutOfRange,
        ErrorCode::NotAuthenticated,
        ErrorCode::InvalidCredentials,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::RefreshTokenInvalid,
        ErrorCode::AccountDisabled,
        ErrorCode::EmailExists,
        ErrorCode::UsernameExists,
        ErrorCode::PasswordTooShort,
        ErrorCode::EmailInvalid,
        ErrorCode::PermissionDenied,
        ErrorCode::AdminRequired,
        ErrorCode::NotResourceOwner,
        ErrorCode::CategoryNotFound,
        ErrorCode::CategoryNameExists,
        ErrorCode::CategoryHasProducts,
        ErrorCode::CategoryHasChildren,
        ErrorCode::CategoryParentNotFound,
        ErrorCode::CategoryCycle,
        ErrorCode::CategoryInactive,
        ErrorCode::OrderNotFound,
        ErrorCode::OrderEmpty,
        ErrorCode::OrderInvalidQuantity,
        ErrorCode::OrderDuplicateProduct,
        ErrorCode::OrderStatusInvalid,
        ErrorCode::OrderAlreadyCompleted,
        ErrorCode::OrderNotPending,
        ErrorCode::MessageNotFound,
        ErrorCode::ReceiverNotFound,
        ErrorCode::MessageToSelf,
        ErrorCode::MessageParentInvalid,
        ErrorCode::ProductNotFound,
        ErrorCode::ProductInvalidPrice,
        ErrorCode::ProductOutOfStock,
        ErrorCode::ProductInvalidStock,
        ErrorCode::ProductHasOrderItems,
        ErrorCode::AdvertisementNotFound,
        ErrorCode::FileTooLarge,
        ErrorCode::UnsupportedFileFormat,
        ErrorCode::InvalidImageFile,
        ErrorCode::ImageNotFound,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
    ];

    #[test]
    fn test_every_code_survives_u16_roundtrip() {
        for &code in ALL_CODES {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw), Ok(code), "code {}", raw);
        }
    }

    #[test]
    fn test_every_code_has_a_message() {
        for &code in ALL_CODES {
            assert!(!code.message().is_empty(), "code {}", code);
        }
    }

    #[test]
    fn test_wire_format_is_a_bare_number() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::CategoryCycle).unwrap(),
            "3006"
        );
        let code: ErrorCode = serde_json::from_str("6201").unwrap();
        assert_eq!(code, ErrorCode::AdvertisementNotFound);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert_eq!(ErrorCode::try_from(2999), Err(InvalidErrorCode(2999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert!(serde_json::from_str::<ErrorCode>("7777").is_err());
    }

    #[test]
    fn test_is_success_only_for_zero() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }

    #[test]
    fn test_display_shows_the_number() {
        assert_eq!(format!("{}", ErrorCode::ProductOutOfStock), "6003");
        assert_eq!(format!("{}", ErrorCode::Success), "0");
    }

    #[test]
    fn test_marketplace_messages() {
        assert_eq!(
            ErrorCode::CategoryCycle.message(),
            "Category cannot be its own ancestor"
        );
        assert_eq!(
            ErrorCode::OrderDuplicateProduct.message(),
            "Order contains duplicate products"
        );
        assert_eq!(
            ErrorCode::MessageToSelf.message(),
            "Cannot send a message to yourself"
        );
    }

    #[test]
    fn test_invalid_code_display() {
        assert_eq!(
            format!("{}", InvalidErrorCode(2999)),
            "invalid error code: 2999"
        );
    }
}
