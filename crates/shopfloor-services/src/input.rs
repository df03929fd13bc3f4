//! Raw text → typed values for service inputs.
//!
//! Pages submit everything as strings; these helpers turn them into typed
//! values or a [`ValidationError`] naming the offending field.

use shopfloor_core::validation::{validate_quantity, validate_stock_quantity, validate_threshold};
use shopfloor_core::ValidationError;

fn parse_i32(field: &str, raw: &str) -> Result<i32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a whole number".to_string(),
    })
}

/// A sale or restock quantity: positive.
pub(crate) fn parse_quantity(raw: &str) -> Result<i32, ValidationError> {
    let quantity = parse_i32("quantity", raw)?;
    validate_quantity(quantity)?;
    Ok(quantity)
}

/// An absolute stock level: zero or more.
pub(crate) fn parse_stock_level(raw: &str) -> Result<i32, ValidationError> {
    let quantity = parse_i32("quantity_in_stock", raw)?;
    validate_stock_quantity(quantity)?;
    Ok(quantity)
}

/// A signed stock adjustment; zero is rejected as a no-op.
pub(crate) fn parse_delta(raw: &str) -> Result<i32, ValidationError> {
    let delta = parse_i32("delta", raw)?;
    if delta == 0 {
        return Err(ValidationError::InvalidFormat {
            field: "delta".to_string(),
            reason: "must not be zero".to_string(),
        });
    }
    Ok(delta)
}

/// A low-stock threshold; blank or absent means the default.
pub(crate) fn parse_threshold(raw: Option<&str>) -> Result<i32, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let threshold = parse_i32("threshold", raw)?;
            validate_threshold(threshold)?;
            Ok(threshold)
        }
        None => Ok(shopfloor_core::DEFAULT_LOW_STOCK_THRESHOLD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_must_be_positive_number() {
        assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
        assert!(matches!(
            parse_quantity("0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_quantity("three"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(parse_quantity(""), Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_stock_level_allows_zero() {
        assert_eq!(parse_stock_level("0").unwrap(), 0);
        assert!(parse_stock_level("-1").is_err());
    }

    #[test]
    fn test_delta_is_signed() {
        assert_eq!(parse_delta("-4").unwrap(), -4);
        assert_eq!(parse_delta("+4").unwrap(), 4);
        assert!(parse_delta("0").is_err());
    }

    #[test]
    fn test_threshold_defaults() {
        assert_eq!(parse_threshold(None).unwrap(), 5);
        assert_eq!(parse_threshold(Some("  ")).unwrap(), 5);
        assert_eq!(parse_threshold(Some("12")).unwrap(), 12);
        assert!(parse_threshold(Some("-1")).is_err());
    }
}
