//! [`ErrorCode`] to HTTP status mapping

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Status the error envelope is served with.
    ///
    /// Clients may switch on either the HTTP status or the body code;
    /// the mapping keeps the two consistent, so a 401 body always holds
    /// a 1xxx code and a 5xxx code never hides behind a 4xx status.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // Caller identity missing, wrong or stale
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::RefreshTokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // Authenticated but not allowed
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::NotResourceOwner => StatusCode::FORBIDDEN,

            // Target row missing or soft-deleted
            Self::NotFound
            | Self::CategoryNotFound
            | Self::CategoryParentNotFound
            | Self::OrderNotFound
            | Self::MessageNotFound
            | Self::ReceiverNotFound
            | Self::ProductNotFound
            | Self::AdvertisementNotFound
            | Self::ImageNotFound => StatusCode::NOT_FOUND,

            // Uniqueness and referential conflicts
            Self::AlreadyExists
            | Self::EmailExists
            | Self::UsernameExists
            | Self::CategoryNameExists
            | Self::CategoryHasProducts
            | Self::CategoryHasChildren
            | Self::ProductHasOrderItems
            | Self::OrderAlreadyCompleted => StatusCode::CONFLICT,

            // Server-side faults
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // Everything else is a rejected request: validation,
            // business rules, out-of-stock, oversized uploads.
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_maps(codes: &[ErrorCode], expected: StatusCode) {
        for code in codes {
            assert_eq!(code.http_status(), expected, "wrong status for {code:?}");
        }
    }

    #[test]
    fn test_success_maps_to_ok() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_identity_failures_are_401() {
        assert_maps(
            &[
                ErrorCode::NotAuthenticated,
                ErrorCode::InvalidCredentials,
                ErrorCode::TokenExpired,
                ErrorCode::TokenInvalid,
                ErrorCode::RefreshTokenInvalid,
                ErrorCode::AccountDisabled,
            ],
            StatusCode::UNAUTHORIZED,
        );
    }

    #[test]
    fn test_ownership_failures_are_403() {
        assert_maps(
            &[
                ErrorCode::PermissionDenied,
                ErrorCode::AdminRequired,
                ErrorCode::NotResourceOwner,
            ],
            StatusCode::FORBIDDEN,
        );
    }

    #[test]
    fn test_missing_resources_are_404() {
        assert_maps(
            &[
                ErrorCode::NotFound,
                ErrorCode::CategoryNotFound,
                ErrorCode::CategoryParentNotFound,
                ErrorCode::OrderNotFound,
                ErrorCode::MessageNotFound,
                ErrorCode::ReceiverNotFound,
                ErrorCode::ProductNotFound,
                ErrorCode::AdvertisementNotFound,
                ErrorCode::ImageNotFound,
            ],
            StatusCode::NOT_FOUND,
        );
    }

    #[test]
    fn test_conflicts_are_409() {
        assert_maps(
            &[
                ErrorCode::AlreadyExists,
                ErrorCode::EmailExists,
                ErrorCode::UsernameExists,
                ErrorCode::CategoryNameExists,
                ErrorCode::CategoryHasProducts,
                ErrorCode::CategoryHasChildren,
                ErrorCode::ProductHasOrderItems,
                ErrorCode::OrderAlreadyCompleted,
            ],
            StatusCode::CONFLICT,
        );
    }

    #[test]
    fn test_server_faults_are_500() {
        assert_maps(
            &[
                ErrorCode::InternalError,
                ErrorCode::DatabaseError,
                ErrorCode::ConfigError,
            ],
            StatusCode::INTERNAL_SERVER_ERROR,
        );
    }

    #[test]
    fn test_business_rules_default_to_400() {
        assert_maps(
            &[
                ErrorCode::ValidationFailed,
                ErrorCode::InvalidRequest,
                ErrorCode::CategoryCycle,
                ErrorCode::CategoryInactive,
                ErrorCode::OrderEmpty,
                ErrorCode::OrderNotPending,
                ErrorCode::FileTooLarge,
                ErrorCode::MessageToSelf,
            ],
            StatusCode::BAD_REQUEST,
        );
    }

    // Stock exhaustion is a rejected purchase, not a write conflict.
    #[test]
    fn test_out_of_stock_is_400_not_409() {
        assert_eq!(
            ErrorCode::ProductOutOfStock.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
