//! # Quantity Module
//!
//! Fixed-point quantity for stock levels and quantities sold.
//!
//! Loose goods (potatoes, onions) are sold by weight, so `1.5` KG has to
//! round-trip exactly. A `Quantity` stores thousandths of a unit as `i64`;
//! packed goods simply use whole multiples of [`Quantity::ONE`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use ts_rs::TS;

use crate::fixed::{self, FixedPointVisitor};

const SCALE: u32 = 3;

/// A quantity in thousandths of a unit (grams for KG products).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Quantity(#[ts(type = "number")] i64);

impl Quantity {
    /// Exactly one unit.
    pub const ONE: Quantity = Quantity(1000);

    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    #[inline]
    pub const fn from_whole(units: i64) -> Self {
        Quantity(units * 1000)
    }

    /// Returns the raw value in thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let frac = abs % 1000;
        if frac == 0 {
            write!(f, "{}{}", sign, abs / 1000)
        } else {
            let digits = format!("{:03}", frac);
            write!(f, "{}{}.{}", sign, abs / 1000, digits.trim_end_matches('0'))
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        fixed::serialize(self.0, SCALE, serializer)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(FixedPointVisitor { scale: SCALE })
            .map(Quantity)
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl Neg for Quantity {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Quantity(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Quantity::from_whole(2).to_string(), "2");
        assert_eq!(Quantity::from_milli(1500).to_string(), "1.5");
        assert_eq!(Quantity::from_milli(-250).to_string(), "-0.25");
    }

    #[test]
    fn test_serde_shape() {
        assert_eq!(serde_json::to_value(Quantity::from_whole(100)).unwrap(), json!(100));
        assert_eq!(serde_json::to_value(Quantity::from_milli(1500)).unwrap(), json!(1.5));

        let q: Quantity = serde_json::from_value(json!("2.5")).unwrap();
        assert_eq!(q.milli(), 2500);
        let q: Quantity = serde_json::from_value(json!(0.333)).unwrap();
        assert_eq!(q.milli(), 333);
    }

    #[test]
    fn test_arithmetic() {
        let stock = Quantity::from_whole(100);
        let sold = Quantity::from_whole(2);
        assert_eq!((stock - sold).milli(), 98_000);
        assert_eq!((stock + (-sold)).milli(), 98_000);
    }
}
