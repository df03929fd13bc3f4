//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  PostgreSQL Error (sqlx::Error)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Categorized, original message kept            │
//! │       │                                                                 │
//! │       ├──────────────► CheckoutError::Storage (inside the sale txn)    │
//! │       ▼                                                                 │
//! │  ServiceError::Storage (in shopfloor-services) ← Adds operation context│
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers never see a raw `sqlx::Error`.

use shopfloor_core::{CoreError, ValidationError};
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate user email
    /// - Second inventory row for the same product
    #[error("Duplicate value violates {constraint}: {message}")]
    UniqueViolation { constraint: String, message: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Inventory for a product_id that doesn't exist
    /// - Deleting a product still referenced by sale_items
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation.
    ///
    /// ## When This Occurs
    /// - A stock adjustment that would drive quantity_in_stock below zero
    #[error("Check constraint violated: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction begin/commit/rollback failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use past the acquire timeout).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Wraps a failure of `BEGIN` / `COMMIT` / `ROLLBACK`.
    pub fn transaction(err: sqlx::Error) -> Self {
        match DbError::from(err) {
            DbError::QueryFailed(msg) | DbError::Internal(msg) => DbError::TransactionFailed(msg),
            other => other,
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (unique)      → DbError::UniqueViolation
/// sqlx::Error::Database (foreign key) → DbError::ForeignKeyViolation
/// sqlx::Error::Database (check)       → DbError::CheckViolation
/// sqlx::Error::Database (other)       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut           → DbError::PoolExhausted
/// sqlx::Error::Io / Tls / PoolClosed  → DbError::ConnectionFailed
/// Other                               → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();

                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                        message,
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation => DbError::CheckViolation { message },
                    _ => DbError::QueryFailed(message),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => DbError::ConnectionFailed(err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Checkout Error
// =============================================================================

/// Failure of the atomic sale workflow.
///
/// Every variant means the transaction was rolled back: no sale, sale item,
/// or inventory change from the attempt persists.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Business rule rejected the sale (validation, missing user or
    /// inventory, insufficient stock).
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Storage failed mid-transaction.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        CheckoutError::Rejected(err.into())
    }
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Storage(err.into())
    }
}

// =============================================================================
// Configuration Error
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(DbError::from(sqlx::Error::PoolTimedOut), DbError::PoolExhausted));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_row_not_found_keeps_message() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        match err {
            DbError::Internal(msg) => assert!(!msg.is_empty()),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn test_transaction_wrapping() {
        let err = DbError::transaction(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::TransactionFailed(_)));
        assert!(err.to_string().starts_with("Transaction failed"));
    }

    #[test]
    fn test_checkout_error_is_transparent() {
        let err: CheckoutError = CoreError::InsufficientStock {
            product_id: 3,
            available: 2,
            requested: 5,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 3: available 2, requested 5"
        );

        let err: CheckoutError = ValidationError::EmptyUpdate.into();
        assert!(matches!(err, CheckoutError::Rejected(CoreError::Validation(_))));
    }
}
