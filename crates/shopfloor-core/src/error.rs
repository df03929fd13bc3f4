//! # Error Types
//!
//! Domain-specific error types for shopfloor-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopfloor-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule failures (not found, stock)      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopfloor-db errors                                                   │
//! │  ├── DbError          - Storage failures (original message kept)       │
//! │  └── CheckoutError    - CoreError | DbError inside the sale txn        │
//! │                                                                         │
//! │  shopfloor-services errors                                             │
//! │  └── ServiceError     - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → ServiceError      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A referenced entity does not exist.
    ///
    /// ## When This Occurs
    /// - Sale owner's user id does not resolve to a user
    /// - No inventory row exists for a product in a sale line
    /// - Discount applied to a sale id that doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout line (product 7, qty: 5)
    ///      │
    ///      ▼
    /// Locked inventory row: quantity_in_stock = 2
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 2, requested: 5 }
    ///      │
    ///      ▼
    /// Whole sale rolled back
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements and are always
/// raised before any storage access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric id, malformed date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A pair of values is inconsistent (e.g., start date after end date).
    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },

    /// A partial update carried no fields.
    #[error("at least one field must be provided")]
    EmptyUpdate,
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
