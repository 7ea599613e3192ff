//! Fixed-point helpers shared by [`Money`](crate::Money) and
//! [`Quantity`](crate::Quantity).
//!
//! Both types store an `i64` count of a small unit (poisha, thousandths) and
//! travel over JSON as plain numbers in the large unit. Incoming values go
//! through `Decimal` so textual input like `"0.29"` scales exactly.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::Serializer;

/// Scales a decimal value up by `10^scale` and rounds half away from zero.
///
/// Returns `None` when the result does not fit in an `i64`.
pub(crate) fn scale_decimal(value: Decimal, scale: u32) -> Option<i64> {
    let factor = Decimal::from(10_i64.checked_pow(scale)?);
    value
        .checked_mul(factor)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Serializes a fixed-point value as a JSON number in the large unit.
///
/// Whole values are written as integers (`70`, not `70.0`).
pub(crate) fn serialize<S: Serializer>(
    value: i64,
    scale: u32,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let factor = 10_i64.pow(scale);
    if value % factor == 0 {
        serializer.serialize_i64(value / factor)
    } else {
        serializer.serialize_f64(value as f64 / factor as f64)
    }
}

/// Visitor accepting JSON numbers, numeric strings and `null`.
///
/// Mirrors how the frontend sends amounts: sometimes numbers, sometimes the
/// raw text of an input box, sometimes nothing at all (treated as zero).
pub(crate) struct FixedPointVisitor {
    pub scale: u32,
}

impl FixedPointVisitor {
    fn finish<E: de::Error>(&self, value: Decimal) -> Result<i64, E> {
        scale_decimal(value, self.scale).ok_or_else(|| E::custom("number out of range"))
    }
}

impl<'de> Visitor<'de> for FixedPointVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        self.finish(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        self.finish(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        let value = Decimal::try_from(v).map_err(E::custom)?;
        self.finish(value)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        let v = v.trim();
        if v.is_empty() {
            return Ok(0);
        }
        let value = Decimal::from_str(v).map_err(E::custom)?;
        self.finish(value)
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> Result<i64, E> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_decimal_rounds_half_away_from_zero() {
        assert_eq!(scale_decimal(Decimal::new(1005, 3), 2), Some(101)); // 1.005
        assert_eq!(scale_decimal(Decimal::new(-1005, 3), 2), Some(-101));
        assert_eq!(scale_decimal(Decimal::new(29, 2), 2), Some(29)); // 0.29
    }

    #[test]
    fn test_scale_decimal_overflow() {
        assert_eq!(scale_decimal(Decimal::MAX, 2), None);
    }
}
