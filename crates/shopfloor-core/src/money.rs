//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    unit price 5.00 → 500 cents                                         │
//! │    subtotal = Σ price_at_sale × quantity, exact                        │
//! │    discount = round(subtotal × bps / 10000), rounded once              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfloor_core::money::Money;
//!
//! let price = Money::parse_decimal("5.00").unwrap();
//! assert_eq!(price.cents(), 500);
//!
//! let line_total = price.multiply_quantity(3);
//! assert_eq!(line_total.to_decimal_string(), "15.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;
use crate::types::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: matches PostgreSQL `BIGINT` columns
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Product.unit_price_cents ──► NewSaleItem.price_at_sale ──► line total
///                                                               │
///                         Sale.subtotal ◄───────── Σ line totals┘
///                              │
///                              ▼
///                  DiscountBreakdown { discount, total }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use shopfloor_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use shopfloor_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    ///
    /// Saturates at the `i64` bounds; use [`Money::checked_multiply_quantity`]
    /// where an overflow must be reported.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use shopfloor_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(299).checked_multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX / 2 + 1).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns the portion of this amount covered by `rate`, rounded half-up
    /// to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// rounding (5000/10000 = 0.5). i128 prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use shopfloor_core::money::Money;
    /// use shopfloor_core::types::DiscountRate;
    ///
    /// // 10% of 15.00 = 1.50
    /// let discount = Money::from_cents(1500).apply_rate(DiscountRate::from_bps(1000));
    /// assert_eq!(discount.cents(), 150);
    ///
    /// // 12.5% of 0.99 = 0.12375 → 0.12
    /// let discount = Money::from_cents(99).apply_rate(DiscountRate::from_bps(1250));
    /// assert_eq!(discount.cents(), 12);
    /// ```
    pub fn apply_rate(&self, rate: DiscountRate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        let rounded = if scaled >= 0 {
            (scaled + 5000) / 10000
        } else {
            (scaled - 5000) / 10000
        };
        Money::from_cents(rounded as i64)
    }

    /// Renders the amount as a plain two-decimal string (`"13.50"`).
    ///
    /// This is the shape numeric fields take in DTOs.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }

    /// Parses a non-negative decimal amount with at most two fractional digits.
    ///
    /// ## Example
    /// ```rust
    /// use shopfloor_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("5").unwrap().cents(), 500);
    /// assert_eq!(Money::parse_decimal("5.5").unwrap().cents(), 550);
    /// assert_eq!(Money::parse_decimal(" 12.34 ").unwrap().cents(), 1234);
    /// assert!(Money::parse_decimal("1.234").is_err());
    /// assert!(Money::parse_decimal("-1").is_err());
    /// ```
    pub fn parse_decimal(raw: &str) -> Result<Money, ValidationError> {
        parse_fixed_point(raw, "price").map(Money::from_cents)
    }
}

/// Parses `"<digits>[.<1-2 digits>]"` into hundredths.
///
/// Shared by `Money` and `DiscountRate` (a percentage in hundredths is bps).
pub(crate) fn parse_fixed_point(raw: &str, field: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::required(field));
    }

    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };

    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
        return Err(ValidationError::invalid_format(
            field,
            "must be a non-negative decimal number",
        ));
    }
    if (raw.contains('.') && fraction.is_empty()) || fraction.len() > 2 {
        return Err(ValidationError::invalid_format(
            field,
            "must have one or two decimal places",
        ));
    }

    let too_large = || ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX / 100,
    };

    let whole: i64 = whole.parse().map_err(|_| too_large())?;
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| too_large())? * 10,
        _ => fraction.parse().map_err(|_| too_large())?,
    };

    whole
        .checked_mul(100)
        .and_then(|hundredths| hundredths.checked_add(fraction))
        .ok_or_else(too_large)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
