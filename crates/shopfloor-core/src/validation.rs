//! # Validation Module
//!
//! Input validation utilities for Shopfloor.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (forms)                                         │
//! │  └── Raw strings, nothing trusted                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services (Rust)                                              │
//! │  └── THIS MODULE: ids, lengths, ranges - fail fast, no storage call    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (PostgreSQL)                                        │
//! │  ├── CHECK (quantity_in_stock >= 0), CHECK (quantity > 0)              │
//! │  ├── UNIQUE (email), UNIQUE (inventory.product_id)                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, NewSaleItem, ProductUpdate};
use crate::MAX_SALE_LINES;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;
const MAX_TYPE_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// Identifiers
// =============================================================================

/// Parses a raw identifier as received from a form or path segment.
///
/// ## Rules
/// - Absent / blank → `Required`
/// - Non-numeric → `InvalidFormat`
/// - Zero or negative → `MustBePositive`
///
/// ## Example
/// ```rust
/// use shopfloor_core::validation::parse_id;
///
/// assert_eq!(parse_id("product_id", "42").unwrap(), 42);
/// assert!(parse_id("product_id", "").is_err());
/// assert!(parse_id("product_id", "abc").is_err());
/// assert!(parse_id("product_id", "0").is_err());
/// ```
pub fn parse_id(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::required(field));
    }

    let id: i64 = raw
        .parse()
        .map_err(|_| ValidationError::invalid_format(field, "must be a number"))?;

    validate_id(field, id)?;
    Ok(id)
}

/// Validates an already-typed identifier.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name (required, at most 100 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("product_name", name, MAX_NAME_LEN)
}

/// Validates a product type / category (required, at most 50 characters).
pub fn validate_product_type(product_type: &str) -> ValidationResult<()> {
    validate_text("product_type", product_type, MAX_TYPE_LEN)
}

/// Validates an optional description (at most 2000 characters).
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates a person's name part.
pub fn validate_person_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_text(field, name, MAX_NAME_LEN)
}

/// Minimal shape check for an email address: one `@`, non-empty local and
/// domain parts, a dot in the domain, no whitespace.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_text("email", email, MAX_EMAIL_LEN)?;

    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::invalid_format("email", "not a valid email address"));
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity (must be positive).
pub fn validate_quantity(qty: i32) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates an absolute stock level (must be non-negative).
pub fn validate_stock_quantity(qty: i32) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity_in_stock".to_string(),
            min: 0,
            max: i64::from(i32::MAX),
        });
    }
    Ok(())
}

/// Validates a low-stock threshold (must be non-negative).
pub fn validate_threshold(threshold: i32) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::OutOfRange {
            field: "threshold".to_string(),
            min: 0,
            max: i64::from(i32::MAX),
        });
    }
    Ok(())
}

/// Validates a price in cents (zero allowed, negative rejected).
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a new product.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.product_name)?;
    validate_product_type(&product.product_type)?;
    validate_description(product.description.as_deref())?;
    validate_price_cents("unit_price", product.unit_price.cents())
}

/// Validates a partial product update: at least one field, each set field valid.
pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }
    if let Some(name) = &update.product_name {
        validate_product_name(name)?;
    }
    if let Some(product_type) = &update.product_type {
        validate_product_type(product_type)?;
    }
    if update.clear_description && update.description.is_some() {
        return Err(ValidationError::invalid_format(
            "description",
            "cannot set and clear the description at once",
        ));
    }
    validate_description(update.description.as_deref())?;
    if let Some(price) = update.unit_price {
        validate_price_cents("unit_price", price.cents())?;
    }
    Ok(())
}

/// Validates the lines of a new sale.
///
/// ## Rules
/// - At least one line, at most `MAX_SALE_LINES`
/// - Each product id positive, quantity positive, price non-negative
/// - Every line total and the subtotal fit in `i64` cents
pub fn validate_sale_lines(lines: &[NewSaleItem]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if lines.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    let mut subtotal = Money::zero();
    for line in lines {
        validate_id("product_id", line.product_id)?;
        validate_quantity(line.quantity)?;
        validate_price_cents("price_at_sale", line.price_at_sale.cents())?;

        subtotal = line
            .checked_line_total()
            .and_then(|total| subtotal.checked_add(total))
            .ok_or_else(subtotal_overflow)?;
    }

    Ok(())
}

/// Error for a sale whose amounts don't fit in `i64` cents.
pub fn subtotal_overflow() -> ValidationError {
    ValidationError::OutOfRange {
        field: "subtotal".to_string(),
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::ProductStatus;

    fn product() -> NewProduct {
        NewProduct {
            product_name: "Espresso beans".to_string(),
            description: Some("1kg bag".to_string()),
            unit_price: Money::from_cents(1899),
            product_type: "coffee".to_string(),
            status: ProductStatus::Available,
        }
    }

    fn line(product_id: i64, quantity: i32) -> NewSaleItem {
        NewSaleItem {
            product_id,
            quantity,
            price_at_sale: Money::from_cents(500),
        }
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", " 7 ").unwrap(), 7);
        assert!(matches!(parse_id("id", ""), Err(ValidationError::Required { .. })));
        assert!(matches!(parse_id("id", "seven"), Err(ValidationError::InvalidFormat { .. })));
        assert!(matches!(parse_id("id", "1.5"), Err(ValidationError::InvalidFormat { .. })));
        assert!(matches!(parse_id("id", "0"), Err(ValidationError::MustBePositive { .. })));
        assert!(matches!(parse_id("id", "-3"), Err(ValidationError::MustBePositive { .. })));
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&product()).is_ok());

        let mut p = product();
        p.product_name = "  ".to_string();
        assert!(validate_new_product(&p).is_err());

        let mut p = product();
        p.product_type = "x".repeat(51);
        assert!(validate_new_product(&p).is_err());

        let mut p = product();
        p.unit_price = Money::from_cents(-1);
        assert!(validate_new_product(&p).is_err());
    }

    #[test]
    fn test_validate_product_update() {
        assert_eq!(
            validate_product_update(&ProductUpdate::default()),
            Err(ValidationError::EmptyUpdate)
        );

        let update = ProductUpdate {
            unit_price: Some(Money::from_cents(250)),
            ..Default::default()
        };
        assert!(validate_product_update(&update).is_ok());

        let update = ProductUpdate {
            product_name: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_product_update(&update).is_err());

        let clear = ProductUpdate {
            clear_description: true,
            ..Default::default()
        };
        assert!(validate_product_update(&clear).is_ok());

        let conflicting = ProductUpdate {
            description: Some("new".to_string()),
            clear_description: true,
            ..Default::default()
        };
        assert!(matches!(
            validate_product_update(&conflicting),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ana.example.com").is_err());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("a na@example.com").is_err());
        assert!(validate_email("ana@@example.com").is_err());
    }

    #[test]
    fn test_validate_quantities() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
        assert!(validate_threshold(0).is_ok());
        assert!(validate_threshold(-5).is_err());
    }

    #[test]
    fn test_validate_sale_lines() {
        assert!(validate_sale_lines(&[line(1, 3)]).is_ok());
        assert!(matches!(validate_sale_lines(&[]), Err(ValidationError::Required { .. })));
        assert!(validate_sale_lines(&[line(1, 3), line(2, 0)]).is_err());
        assert!(validate_sale_lines(&[line(0, 1)]).is_err());

        let too_many: Vec<_> = (1..=(MAX_SALE_LINES as i64 + 1)).map(|id| line(id, 1)).collect();
        assert!(validate_sale_lines(&too_many).is_err());
    }

    #[test]
    fn test_validate_sale_lines_rejects_overflowing_amounts() {
        let huge = Money::parse_decimal("50000000000000000").unwrap();
        let line_overflow = NewSaleItem {
            product_id: 1,
            quantity: 2,
            price_at_sale: huge,
        };
        assert!(matches!(
            validate_sale_lines(&[line_overflow]),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "subtotal"
        ));

        // Each line fits on its own, the sum does not
        let single = NewSaleItem { quantity: 1, ..line_overflow };
        let two = [single, NewSaleItem { product_id: 2, ..single }];
        assert_eq!(validate_sale_lines(&two), Err(subtotal_overflow()));

        let fits = NewSaleItem { quantity: 1, ..line_overflow };
        assert!(validate_sale_lines(&[fits]).is_ok());
    }
}
