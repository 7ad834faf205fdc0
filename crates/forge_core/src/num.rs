//! Big-number adapter over `break_infinity::Decimal`.
//!
//! Progression balances routinely leave `f64` range, so every economy
//! quantity is a [`Num`]. All arithmetic the engine needs goes through this
//! module; nothing outside it touches the underlying decimal type.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use break_infinity::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Largest decimal exponent a `pow` result may carry. Anything beyond this is
/// clamped to [`Num::huge`] so a non-finite value can never enter game state.
const MAX_POW_EXPONENT: f64 = 9.0e15;

/// Arbitrary-range non-negative-friendly decimal. Construction is funneled
/// through [`Num::from_f64`] and the clamped [`pow`], which keeps NaN and
/// infinity out of the representation.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Num(Decimal);

impl Num {
    pub fn zero() -> Self {
        Num(Decimal::new(0.0))
    }

    pub fn one() -> Self {
        Num(Decimal::new(1.0))
    }

    /// Converts a native float, mapping non-finite inputs to zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Num(Decimal::new(value))
        } else {
            Num::zero()
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Num(Decimal::new(value as f64))
    }

    /// Large-but-finite sentinel used when a computed exponent leaves the
    /// representable range.
    pub fn huge() -> Self {
        Num(break_infinity::from_mantissa_exponent(1.0, MAX_POW_EXPONENT))
    }

    /// Lossy conversion for display and small-magnitude checks. Values beyond
    /// `f64` range come back as `f64::INFINITY`.
    pub fn to_f64(&self) -> f64 {
        self.0.to_number()
    }

    /// NaN is the only non-finite value the underlying decimal can carry;
    /// construction and `pow` clamp infinities before they appear.
    pub fn is_finite(&self) -> bool {
        !self.0.to_number().is_nan()
    }

    pub fn floor(&self) -> Self {
        Num(self.0.floor())
    }

    /// Base-10 logarithm as a native float. The decimal exponent always fits
    /// in `f64`, so no range is lost. Non-positive values yield `-inf`.
    pub fn log10(&self) -> f64 {
        if *self <= Num::zero() {
            f64::NEG_INFINITY
        } else {
            self.0.log10()
        }
    }

    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    pub fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }

    /// Subtraction floored at zero; balances never go negative.
    pub fn saturating_sub(self, other: Self) -> Self {
        if other >= self {
            Num::zero()
        } else {
            self - other
        }
    }
}

/// `base ^ exponent` in exponent-of-logarithm form: `10^(exponent × log10 base)`.
///
/// Exponents whose decimal magnitude leaves the representable range are
/// clamped — positive overflow to [`Num::huge`], negative to zero. A
/// non-positive base yields zero (no economy quantity is negative).
pub fn pow(base: &Num, exponent: &Num) -> Num {
    if *base <= Num::zero() {
        return Num::zero();
    }
    if *exponent == Num::zero() {
        return Num::one();
    }
    let log_base = base.log10();
    let scaled = (exponent.0 * Decimal::new(log_base)).to_number();
    if scaled.is_nan() {
        return Num::one();
    }
    if scaled > MAX_POW_EXPONENT {
        return Num::huge();
    }
    if scaled < -MAX_POW_EXPONENT {
        return Num::zero();
    }
    let int_part = scaled.trunc();
    let frac_part = scaled - int_part;
    Num(break_infinity::from_mantissa_exponent(
        10f64.powf(frac_part),
        int_part,
    ))
}

/// `base ^ exponent` for a native-float base.
pub fn powf(base: f64, exponent: &Num) -> Num {
    pow(&Num::from_f64(base), exponent)
}

impl Add for Num {
    type Output = Num;
    fn add(self, rhs: Num) -> Num {
        Num(self.0 + rhs.0)
    }
}

impl Sub for Num {
    type Output = Num;
    fn sub(self, rhs: Num) -> Num {
        Num(self.0 - rhs.0)
    }
}

impl Mul for Num {
    type Output = Num;
    fn mul(self, rhs: Num) -> Num {
        Num(self.0 * rhs.0)
    }
}

impl Div for Num {
    type Output = Num;
    fn div(self, rhs: Num) -> Num {
        Num(self.0 / rhs.0)
    }
}

impl Default for Num {
    fn default() -> Self {
        Num::zero()
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Serialized as the compact decimal string form so snapshots round-trip
// exactly and stay readable in JSON.
impl Serialize for Num {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Num {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let value: Decimal = text
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid decimal literal: {text:?}")))?;
        Ok(Num(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_value(actual: Num, expected: f64) {
        assert!(
            (actual.to_f64() - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn from_f64_maps_non_finite_to_zero() {
        assert_eq!(Num::from_f64(f64::NAN), Num::zero());
        assert_eq!(Num::from_f64(f64::INFINITY), Num::zero());
        assert_value(Num::from_f64(2.5), 2.5);
    }

    #[test]
    fn arithmetic_small_values_match_f64() {
        let a = Num::from_f64(10.0);
        let b = Num::from_f64(4.0);
        assert_value(a + b, 14.0);
        assert_value(a - b, 6.0);
        assert_value(a * b, 40.0);
        assert_value(a / b, 2.5);
    }

    #[test]
    fn pow_integer_exponent() {
        let result = pow(&Num::from_f64(2.0), &Num::from_f64(10.0));
        assert!((result.to_f64() - 1024.0).abs() < 1e-6);
    }

    #[test]
    fn pow_zero_exponent_is_one() {
        assert_eq!(pow(&Num::from_f64(1.07), &Num::zero()), Num::one());
    }

    #[test]
    fn pow_overflow_clamps_to_finite_sentinel() {
        let enormous = pow(&Num::from_f64(10.0), &Num::huge());
        assert!(enormous.is_finite());
        assert_eq!(enormous, Num::huge());
    }

    #[test]
    fn pow_deep_negative_clamps_to_zero() {
        let tiny = pow(&Num::from_f64(0.1), &Num::huge());
        assert_eq!(tiny, Num::zero());
    }

    #[test]
    fn floor_drops_fraction() {
        assert_value(Num::from_f64(3.9).floor(), 3.0);
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let small = Num::from_f64(3.0);
        let big = Num::from_f64(7.0);
        assert_eq!(small.saturating_sub(big), Num::zero());
        assert_value(big.saturating_sub(small), 4.0);
    }

    #[test]
    fn serde_round_trip_is_exact() {
        let original = pow(&Num::from_f64(1.09), &Num::from_f64(3000.0));
        let json = serde_json::to_string(&original).unwrap();
        let restored: Num = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn serde_rejects_garbage() {
        let result: Result<Num, _> = serde_json::from_str("\"not a number\"");
        assert!(result.is_err());
    }

    #[test]
    fn ordering_spans_exponent_range() {
        let small = Num::from_f64(1e10);
        let large = pow(&Num::from_f64(10.0), &Num::from_f64(400.0));
        assert!(small < large);
        assert_eq!(small.max(large), large);
        assert_eq!(small.min(large), small);
    }
}
