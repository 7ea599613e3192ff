//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    The Floating Point Problem                           │
//! │                                                                         │
//! │  In JavaScript / f64:                                                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  A customer's due accumulates over dozens of half-paid sales.           │
//! │  Every float error is carried forward into the next sale.               │
//! │                                                                         │
//! │  Our solution: Store poisha as i64                                      │
//! │    10 + 20 = 30 poisha (৳0.30)  ✅                                      │
//! │                                                                         │
//! │  ৳150.50 due is stored as 15050 poisha (exact)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The frontend speaks taka as plain JSON numbers (`70`, `150.5`). `Money`
//! serializes to that shape and accepts numbers, numeric strings and `null`
//! (zero) when deserializing, rounding to the nearest poisha.
//!
//! ## Usage
//! ```rust
//! use smstore_core::money::Money;
//!
//! // Create from poisha (preferred)
//! let price = Money::from_poisha(3500); // ৳35.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                         // ৳70.00
//! let total = price + Money::from_poisha(480_00);  // ৳515.00
//! assert_eq!(total.poisha(), 515_00);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::fixed::{self, FixedPointVisitor};
use crate::quantity::Quantity;

/// Number of decimal places between taka and poisha.
const SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in poisha (1/100 of a taka).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values (a customer paying more than
///   the total leaves a negative shortfall, which is recorded as-is)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Transparent sqlx type**: Stored as a plain INTEGER column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from poisha (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use smstore_core::money::Money;
    ///
    /// let price = Money::from_poisha(1099); // Represents ৳10.99
    /// assert_eq!(price.poisha(), 1099);
    /// ```
    #[inline]
    pub const fn from_poisha(poisha: i64) -> Self {
        Money(poisha)
    }

    /// Creates a Money value from whole taka.
    ///
    /// ## Example
    /// ```rust
    /// use smstore_core::money::Money;
    ///
    /// assert_eq!(Money::from_taka(35).poisha(), 3500);
    /// ```
    #[inline]
    pub const fn from_taka(taka: i64) -> Self {
        Money(taka * 100)
    }

    /// Returns the value in poisha.
    #[inline]
    pub const fn poisha(&self) -> i64 {
        self.0
    }

    /// Returns the whole-taka portion.
    ///
    /// ## Example
    /// ```rust
    /// use smstore_core::money::Money;
    ///
    /// assert_eq!(Money::from_poisha(15050).taka(), 150);
    /// assert_eq!(Money::from_poisha(-550).taka(), -5);
    /// ```
    #[inline]
    pub const fn taka(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the poisha portion (always 0-99).
    #[inline]
    pub const fn poisha_part(&self) -> i64 {
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `Some(self)` unless the value is zero.
    ///
    /// The checkout form sends `0` for "not entered", so a zero price or
    /// line total means "fall back to the next source".
    #[inline]
    pub const fn non_zero(self) -> Option<Self> {
        if self.0 == 0 {
            None
        } else {
            Some(self)
        }
    }

    /// `self + other`, or `None` past the i64 range.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// `self - other`, or `None` past the i64 range.
    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Multiplies a unit price by a (possibly fractional) quantity.
    ///
    /// The product is rounded half away from zero to the nearest poisha.
    /// Returns `None` when the result does not fit in i64.
    ///
    /// ## Example
    /// ```rust
    /// use smstore_core::money::Money;
    /// use smstore_core::quantity::Quantity;
    ///
    /// // Onion ৳70/KG × 0.333 KG = ৳23.31
    /// let line = Money::from_taka(70).multiply_quantity(Quantity::from_milli(333));
    /// assert_eq!(line.map(|m| m.poisha()), Some(2331));
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> Option<Money> {
        let raw = self.0 as i128 * qty.milli() as i128;
        let divisor = Quantity::ONE.milli() as i128;
        let half = divisor / 2;
        let rounded = if raw >= 0 {
            (raw + half) / divisor
        } else {
            (raw - half) / divisor
        };
        i64::try_from(rounded).ok().map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs. The frontend formats amounts for the user.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}৳{}.{:02}", sign, self.taka().abs(), self.poisha_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        fixed::serialize(self.0, SCALE, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(FixedPointVisitor { scale: SCALE })
            .map(Money)
    }
}

// Operators saturate at the i64 bounds. Request amounts go through the
// `checked_*` methods instead, which report overflow.

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by whole pieces.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
