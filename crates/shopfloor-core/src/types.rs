//! # Domain Types
//!
//! Core domain types used throughout Shopfloor.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐ 1:1 ┌─────────────────┐                            │
//! │  │    Product      │◄────│   Inventory     │                            │
//! │  │  product_id     │     │  product_id     │                            │
//! │  │  unit_price     │     │  quantity ≥ 0   │                            │
//! │  │  status         │     │  last_updated   │                            │
//! │  └────────▲────────┘     └─────────────────┘                            │
//! │           │ product_id                                                  │
//! │  ┌────────┴────────┐ n:1 ┌─────────────────┐ n:1 ┌─────────────────┐    │
//! │  │    SaleItem     │────►│      Sale       │────►│      User       │    │
//! │  │  quantity > 0   │     │  subtotal       │     │  email (unique) │    │
//! │  │  price_at_sale  │     │  discount_bps   │     │  role           │    │
//! │  │  (immutable)    │     │  discount/total │     └─────────────────┘    │
//! │  └─────────────────┘     └─────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Monetary columns are integer cents; see [`crate::money`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{parse_fixed_point, Money};
use crate::MAX_DISCOUNT_BPS;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount percentage represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10% and 10000 bps = 100%.
/// Deserializing rejects anything above 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points without range checking.
    ///
    /// For constants and trusted values; use [`DiscountRate::checked_from_bps`]
    /// for anything that came from outside.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a whole percentage.
    ///
    /// Fails when `percent` is above 100.
    pub fn from_whole_percent(percent: u32) -> Result<Self, ValidationError> {
        Self::checked_from_bps(i64::from(percent) * 100)
    }

    /// Validates a raw basis-point value (e.g., read back from storage).
    pub fn checked_from_bps(bps: i64) -> Result<Self, ValidationError> {
        if !(0..=i64::from(MAX_DISCOUNT_BPS)).contains(&bps) {
            return Err(ValidationError::OutOfRange {
                field: "discount_percentage".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(DiscountRate(bps as u32))
    }

    /// Parses a percentage such as `"10"`, `"12.5"` or `"0.25"`.
    ///
    /// ## Rules
    /// - Non-negative decimal, at most two fractional digits
    /// - Must lie in `[0, 100]`
    ///
    /// ## Example
    /// ```rust
    /// use shopfloor_core::types::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::parse_percentage("12.5").unwrap().bps(), 1250);
    /// assert!(DiscountRate::parse_percentage("100.01").is_err());
    /// assert!(DiscountRate::parse_percentage("ten").is_err());
    /// ```
    pub fn parse_percentage(raw: &str) -> Result<Self, ValidationError> {
        let bps = parse_fixed_point(raw, "discount_percentage")?;
        Self::checked_from_bps(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Renders the percentage with two decimals (`"12.50"`).
    pub fn to_percentage_string(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl TryFrom<u32> for DiscountRate {
    type Error = ValidationError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Self::checked_from_bps(i64::from(bps))
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_percentage_string())
    }
}

// =============================================================================
// Discount Breakdown
// =============================================================================

/// The three monetary figures of a sale, always computed together.
///
/// ## Invariant
/// ```text
/// discount = round(subtotal × rate / 100, 2)
/// total    = subtotal − discount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub subtotal: Money,
    pub rate: DiscountRate,
    pub discount: Money,
    pub total: Money,
}

impl DiscountBreakdown {
    /// Computes discount and total from a subtotal and a rate.
    pub fn compute(subtotal: Money, rate: DiscountRate) -> Self {
        let discount = subtotal.apply_rate(rate);
        DiscountBreakdown {
            subtotal,
            rate,
            discount,
            total: subtotal - discount,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Whether a product is currently offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "product_status"))]
pub enum ProductStatus {
    #[serde(rename = "available")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "available"))]
    Available,
    #[serde(rename = "not available")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "not available"))]
    NotAvailable,
}

impl ProductStatus {
    /// Storage / display label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::NotAvailable => "not available",
        }
    }
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Available
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "available" => Ok(ProductStatus::Available),
            "not available" => Ok(ProductStatus::NotAvailable),
            "" => Err(ValidationError::required("status")),
            _ => Err(ValidationError::invalid_format(
                "status",
                "must be 'available' or 'not available'",
            )),
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub description: Option<String>,
    /// Current unit price in cents. Sale lines snapshot this value.
    pub unit_price_cents: i64,
    pub product_type: String,
    pub status: ProductStatus,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Whether the product can be put on a new sale.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Available
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub product_name: String,
    pub description: Option<String>,
    pub unit_price: Money,
    pub product_type: String,
    pub status: ProductStatus,
}

/// Partial product update. `None` leaves a field unchanged.
///
/// `clear_description` sets the description to NULL; it can't be combined
/// with a new `description`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub unit_price: Option<Money>,
    pub product_type: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.description.is_none()
            && !self.clear_description
            && self.unit_price.is_none()
            && self.product_type.is_none()
            && self.status.is_none()
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock record, one per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Inventory {
    pub inventory_id: i64,
    pub product_id: i64,
    pub quantity_in_stock: i32,
    pub last_updated: DateTime<Utc>,
}

/// Inventory joined with the product columns shown on stock pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryWithProduct {
    pub inventory_id: i64,
    pub product_id: i64,
    pub quantity_in_stock: i32,
    pub last_updated: DateTime<Utc>,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub product_type: String,
    pub status: ProductStatus,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale owned by a user.
///
/// Created with all totals at zero, then finalized once its items are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub sale_id: i64,
    pub user_id: i64,
    pub sale_date: DateTime<Utc>,
    pub subtotal_cents: i64,
    /// Discount percentage in basis points (1000 = 10%).
    pub discount_bps: i32,
    pub discount_cents: i64,
    pub total_cents: i64,
}

impl Sale {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// The stored discount rate. Out-of-range values cannot be written by the
    /// repositories, so they read back as zero.
    pub fn discount_rate(&self) -> DiscountRate {
        DiscountRate::checked_from_bps(i64::from(self.discount_bps)).unwrap_or_default()
    }

    /// Stored figures as a breakdown.
    pub fn breakdown(&self) -> DiscountBreakdown {
        DiscountBreakdown {
            subtotal: self.subtotal(),
            rate: self.discount_rate(),
            discount: self.discount(),
            total: self.total(),
        }
    }
}

/// A line of a sale. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub sale_item_id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// Unit price in cents at time of sale (frozen).
    pub price_at_sale_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn price_at_sale(&self) -> Money {
        Money::from_cents(self.price_at_sale_cents)
    }

    /// `price_at_sale × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price_at_sale().multiply_quantity(i64::from(self.quantity))
    }
}

/// Input line for a new sale.
///
/// `price_at_sale` is supplied by the caller so the sale records the price
/// the customer saw, independent of later product edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_sale: Money,
}

impl NewSaleItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price_at_sale.multiply_quantity(i64::from(self.quantity))
    }

    /// `price_at_sale × quantity`, `None` when it does not fit in cents.
    #[inline]
    pub fn checked_line_total(&self) -> Option<Money> {
        self.price_at_sale.checked_multiply_quantity(i64::from(self.quantity))
    }
}

// =============================================================================
// User
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "user_role", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Customer,
    Guest,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Customer
    }
}

/// A user account. The password hash never leaves the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
}

/// Input for creating a user. Hashing is done by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

// =============================================================================
// Unit Tests
// =============================================================================
