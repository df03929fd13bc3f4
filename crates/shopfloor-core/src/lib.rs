//! # shopfloor-core: Pure Business Logic for the Shopfloor back office
//!
//! This crate holds the domain types and arithmetic shared by the storage
//! and service layers. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Shopfloor Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Presentation layer (pages, forms, sessions)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shopfloor-services                              │   │
//! │  │     ProductService, InventoryService, SaleService, DTOs         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  shopfloor-db                                   │   │
//! │  │     Repositories, checkout transaction, migrations              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ uses types from                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shopfloor-core (THIS CRATE) ★                     │   │
//! │  │   types • money • dates • validation • error                    │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Product, Inventory, Sale, SaleItem, User) and `DiscountRate`
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`dates`] - `DD/MM/YYYY` parsing and formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use shopfloor_core::money::Money;
//! use shopfloor_core::types::{DiscountBreakdown, DiscountRate};
//!
//! let subtotal = Money::from_cents(1500); // 15.00
//! let rate = DiscountRate::from_bps(1000); // 10%
//!
//! let breakdown = DiscountBreakdown::compute(subtotal, rate);
//! assert_eq!(breakdown.discount.cents(), 150);
//! assert_eq!(breakdown.total.cents(), 1350);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dates;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default threshold for low-stock queries.
///
/// Inventory rows with `quantity_in_stock` strictly below this value are
/// reported as low stock when the caller does not supply a threshold.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

/// Maximum number of lines accepted in a single sale.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum discount in basis points (100%).
pub const MAX_DISCOUNT_BPS: u32 = 10_000;
