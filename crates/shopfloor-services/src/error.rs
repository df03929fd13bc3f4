//! # Service Error Type
//!
//! The single error type handed to the presentation layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Shopfloor                              │
//! │                                                                         │
//! │  raw input ──► validation ── ValidationError ─────────┐               │
//! │                    │                                   │               │
//! │                    ▼                                   │               │
//! │  repository ── Ok(None) ─────────── NotFound ─────────┤               │
//! │      │                                                 │               │
//! │      ├── DbError ── .context("loading sale 7") ─ Storage ─► ServiceError│
//! │      │                                                 │               │
//! │  checkout ── CheckoutError::Rejected(CoreError) ──────┤               │
//! │          └── CheckoutError::Storage(DbError) ── Storage┘               │
//! │                                                                         │
//! │  ServiceError::body() → { "code": "NOT_FOUND", "message": "..." }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is retried. Storage failures keep the underlying
//! [`DbError`] as their `source()`.

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use shopfloor_core::{CoreError, ValidationError};
use shopfloor_db::{CheckoutError, DbError};

/// Errors returned by every service method.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad or missing input, caught before storage was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Requested quantity exceeds available stock.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// The database failed while doing `context`.
    #[error("{context}: {source}")]
    Storage { context: String, source: DbError },
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Creates a not found error.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Machine-readable code for the presentation layer.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Validation(_) => ErrorCode::ValidationError,
            ServiceError::NotFound { .. } => ErrorCode::NotFound,
            ServiceError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            ServiceError::Storage {
                source: DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. },
                ..
            } => ErrorCode::Conflict,
            ServiceError::Storage { .. } => ErrorCode::DatabaseError,
        }
    }

    /// Serializable form for a flash message or JSON response.
    ///
    /// Storage details are logged here and replaced by the context line, so
    /// SQL text never reaches a page.
    pub fn body(&self) -> ErrorBody {
        let message = match self {
            ServiceError::Storage { context, source } => {
                error!(context = %context, error = %source, "Storage failure");
                format!("{context}: database operation failed")
            }
            other => other.to_string(),
        };

        ErrorBody {
            code: self.code(),
            message,
        }
    }

    /// Wraps a checkout failure, adding `context` to storage errors.
    pub fn from_checkout(err: CheckoutError, context: impl Into<String>) -> Self {
        match err {
            CheckoutError::Rejected(core) => core.into(),
            CheckoutError::Storage(source) => ServiceError::Storage {
                context: context.into(),
                source,
            },
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => ServiceError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            CoreError::Validation(err) => ServiceError::Validation(err),
        }
    }
}

/// Error codes for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Insufficient stock (409)
    InsufficientStock,

    /// Duplicate or still-referenced row (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,
}

/// What the presentation layer shows when a call fails.
///
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "message": "Insufficient stock for product 3: available 2, requested 5" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

/// Adds operation context to repository results.
///
/// ```rust,ignore
/// let sale = db.sales().find_by_id(id).await.context(format!("loading sale {id}"))?;
/// ```
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> ServiceResult<T>;
}

impl<T> ResultExt<T> for Result<T, DbError> {
    fn context(self, context: impl Into<String>) -> ServiceResult<T> {
        self.map_err(|source| ServiceError::Storage {
            context: context.into(),
            source,
        })
    }
}
