//! Order domain logic: numbers, totals, expiry
//!
//! Pure functions only; the SQL lives in `db::orders` and the background
//! task in [`sweeper`].

pub mod sweeper;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::OrderItemInput;

/// Orders stuck in PENDING / IN_PROGRESS longer than this are completed
/// automatically.
pub const EXPIRY_DAYS: i64 = 30;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// `DDMMYYYY` key for the per-day order counter.
pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%d%m%Y").to_string()
}

/// `DDMMYYYYHHMMSS_NNNN`: UTC timestamp plus the zero-padded per-day
/// sequence. Uniqueness comes from the sequence, not the timestamp.
pub fn format_order_number(at: DateTime<Utc>, seq: i64) -> String {
    format!("{}_{:04}", at.format("%d%m%Y%H%M%S"), seq)
}

/// Cutoff in Unix millis: orders created before it have expired.
pub fn expiry_cutoff(now_ms: i64) -> i64 {
    now_ms - EXPIRY_DAYS * DAY_MS
}

/// Validate the shape of an order request: non-empty, positive
/// quantities, no duplicate product lines.
pub fn validate_items(items: &[OrderItemInput]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    let mut seen = HashSet::new();
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::new(ErrorCode::OrderInvalidQuantity)
                .with_detail("product_id", item.product_id));
        }
        if !seen.insert(item.product_id) {
            return Err(AppError::new(ErrorCode::OrderDuplicateProduct)
                .with_detail("product_id", item.product_id));
        }
    }
    Ok(())
}

/// `total_amount = Σ quantity·price`, `total_items = Σ quantity`.
pub fn order_totals(lines: &[(Decimal, i32)]) -> (Decimal, i32) {
    let mut amount = Decimal::ZERO;
    let mut count = 0i32;
    for (price, quantity) in lines {
        amount += *price * Decimal::from(*quantity);
        count += *quantity;
    }
    (amount, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_order_number_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 25, 14, 30, 59).unwrap();
        assert_eq!(format_order_number(at, 1), "25082026143059_0001");
        assert_eq!(format_order_number(at, 42), "25082026143059_0042");
        // The pad is a minimum, busy days keep counting
        assert_eq!(format_order_number(at, 12345), "25082026143059_12345");
    }

    #[test]
    fn test_day_key() {
        let at = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 1).unwrap();
        assert_eq!(day_key(at), "03012026");
    }

    #[test]
    fn test_order_totals_worked_example() {
        // [{price 10, qty 2}, {price 5, qty 1}] -> 25 / 3
        let lines = [(Decimal::new(10, 0), 2), (Decimal::new(5, 0), 1)];
        let (amount, count) = order_totals(&lines);
        assert_eq!(amount, Decimal::new(25, 0));
        assert_eq!(count, 3);
    }

    #[test]
    fn test_order_totals_empty() {
        let (amount, count) = order_totals(&[]);
        assert_eq!(amount, Decimal::ZERO);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_order_totals_cents() {
        // 3 x 19.99 + 2 x 0.01 = 59.99
        let lines = [(Decimal::new(1999, 2), 3), (Decimal::new(1, 2), 2)];
        let (amount, count) = order_totals(&lines);
        assert_eq!(amount, Decimal::new(5999, 2));
        assert_eq!(count, 5);
    }

    #[test]
    fn test_validate_items() {
        let ok = vec![
            OrderItemInput {
                product_id: 1,
                quantity: 2,
            },
            OrderItemInput {
                product_id: 2,
                quantity: 1,
            },
        ];
        assert!(validate_items(&ok).is_ok());

        assert_eq!(
            validate_items(&[]).unwrap_err().code,
            ErrorCode::OrderEmpty
        );

        let zero_qty = vec![OrderItemInput {
            product_id: 1,
            quantity: 0,
        }];
        assert_eq!(
            validate_items(&zero_qty).unwrap_err().code,
            ErrorCode::OrderInvalidQuantity
        );

        let negative_qty = vec![OrderItemInput {
            product_id: 1,
            quantity: -3,
        }];
        assert_eq!(
            validate_items(&negative_qty).unwrap_err().code,
            ErrorCode::OrderInvalidQuantity
        );

        let duplicate = vec![
            OrderItemInput {
                product_id: 7,
                quantity: 1,
            },
            OrderItemInput {
                product_id: 7,
                quantity: 2,
            },
        ];
        assert_eq!(
            validate_items(&duplicate).unwrap_err().code,
            ErrorCode::OrderDuplicateProduct
        );
    }

    #[test]
    fn test_expiry_cutoff() {
        let now = 1_756_000_000_000i64;
        let cutoff = expiry_cutoff(now);
        assert_eq!(now - cutoff, 30 * 24 * 60 * 60 * 1000);
    }
}
