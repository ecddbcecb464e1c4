//! Coarse error families derived from the code ranges

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Family an [`ErrorCode`] belongs to, keyed by its thousands digit.
///
/// Used for log routing (System errors are logged at error level when
/// rendered) and exposed in snake_case for diagnostics tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Cross-cutting request failures (0xxx)
    General,
    /// Login, token and account state (1xxx)
    Auth,
    /// Role and ownership checks (2xxx)
    Permission,
    /// Category tree operations (3xxx)
    Category,
    /// Order lifecycle (4xxx)
    Order,
    /// Direct messages and conversations (5xxx)
    Messaging,
    /// Products, advertisements and uploads (6xxx)
    Catalog,
    /// Faults on our side (9xxx)
    System,
}

impl ErrorCategory {
    /// Family for a raw code value. Unassigned ranges count as System.
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 => Self::Auth,
            2 => Self::Permission,
            3 => Self::Category,
            4 => Self::Order,
            5 => Self::Messaging,
            6 => Self::Catalog,
            _ => Self::System,
        }
    }

    /// snake_case label, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Category => "category",
            Self::Order => "order",
            Self::Messaging => "messaging",
            Self::Catalog => "catalog",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCategory; 8] = [
        ErrorCategory::General,
        ErrorCategory::Auth,
        ErrorCategory::Permission,
        ErrorCategory::Category,
        ErrorCategory::Order,
        ErrorCategory::Messaging,
        ErrorCategory::Catalog,
        ErrorCategory::System,
    ];

    #[test]
    fn test_thousands_digit_picks_the_family() {
        let cases = [
            (0, ErrorCategory::General),
            (999, ErrorCategory::General),
            (1001, ErrorCategory::Auth),
            (1999, ErrorCategory::Auth),
            (2003, ErrorCategory::Permission),
            (3006, ErrorCategory::Category),
            (4007, ErrorCategory::Order),
            (5003, ErrorCategory::Messaging),
            (6504, ErrorCategory::Catalog),
            (9001, ErrorCategory::System),
        ];
        for (code, family) in cases {
            assert_eq!(ErrorCategory::from_code(code), family, "code {code}");
        }
    }

    #[test]
    fn test_unassigned_ranges_fall_back_to_system() {
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(8500), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(u16::MAX), ErrorCategory::System);
    }

    #[test]
    fn test_codes_carry_their_family() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(
            ErrorCode::NotResourceOwner.category(),
            ErrorCategory::Permission
        );
        assert_eq!(ErrorCode::CategoryCycle.category(), ErrorCategory::Category);
        assert_eq!(ErrorCode::OrderNotPending.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::MessageToSelf.category(), ErrorCategory::Messaging);
        assert_eq!(
            ErrorCode::AdvertisementNotFound.category(),
            ErrorCategory::Catalog
        );
        assert_eq!(ErrorCode::FileTooLarge.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_name_matches_wire_format() {
        for family in ALL {
            let json = serde_json::to_string(&family).unwrap();
            assert_eq!(json, format!("\"{}\"", family.name()));
        }
    }

    #[test]
    fn test_wire_roundtrip() {
        for family in ALL {
            let json = serde_json::to_string(&family).unwrap();
            let back: ErrorCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, family);
        }
    }
}
