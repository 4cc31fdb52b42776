//! A base-10 fixed-point number carried on the wire as an `f64`.
//!
//! The wire representation is lossy: encoding goes through
//! [`Decimal::to_f64`] and decoding rounds the double back to 15 significant
//! digits. Values needing more precision than a double offers do not
//! round-trip exactly.

use std::fmt;

/// `mantissa / 10^scale` with `|mantissa| < 2^96` and `scale <= 28`.
///
/// Values are kept normalised (no trailing zeros in the mantissa), so the
/// derived equality is numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

/// Exclusive bound on the mantissa magnitude.
const MANTISSA_LIMIT: i128 = 1 << 96;

/// Significant digits kept when converting from a double.
const SIGNIFICANT_DIGITS: i32 = 15;

impl Decimal {
    /// The largest supported scale.
    pub const MAX_SCALE: u8 = 28;

    /// Zero.
    pub const ZERO: Self = Self { mantissa: 0, scale: 0 };

    /// Creates `mantissa / 10^scale`.
    ///
    /// Returns `None` when the mantissa is out of range or the scale exceeds
    /// [`Self::MAX_SCALE`].
    #[must_use]
    pub fn new(mantissa: i128, scale: u8) -> Option<Self> {
        if scale > Self::MAX_SCALE
            || mantissa.unsigned_abs() >= MANTISSA_LIMIT.unsigned_abs()
        {
            return None;
        }
        Some(Self { mantissa, scale }.normalized())
    }

    /// Creates a decimal holding an integer exactly.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self { mantissa: i128::from(value), scale: 0 }.normalized()
    }

    /// The mantissa of the normalised representation.
    #[must_use]
    pub const fn mantissa(&self) -> i128 { self.mantissa }

    /// The scale of the normalised representation.
    #[must_use]
    pub const fn scale(&self) -> u8 { self.scale }

    /// Converts to the nearest double.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(i32::from(self.scale))
    }

    /// Converts a double, keeping 15 significant digits.
    ///
    /// Returns `None` for NaN, infinities and magnitudes outside the
    /// representable range. Values too small for [`Self::MAX_SCALE`] become
    /// zero.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value == 0.0 {
            return Some(Self::ZERO);
        }

        // `d.dddddddddddddde±x`, always SIGNIFICANT_DIGITS digits.
        let formatted =
            format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
        let (digits, exponent) = formatted.split_once('e')?;
        let exponent: i32 = exponent.parse().ok()?;

        let negative = digits.starts_with('-');
        let mut mantissa: i128 = digits
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .ok()?;
        if negative {
            mantissa = -mantissa;
        }

        // value == mantissa * 10^(exponent - (SIGNIFICANT_DIGITS - 1))
        let shift = exponent - (SIGNIFICANT_DIGITS - 1);
        let max_scale = i32::from(Self::MAX_SCALE);

        if shift >= 0 {
            let factor = 10i128.checked_pow(u32::try_from(shift).ok()?)?;
            return Self::new(mantissa.checked_mul(factor)?, 0);
        }

        let mut scale = -shift;
        if scale > max_scale {
            let excess = scale - max_scale;
            if excess > SIGNIFICANT_DIGITS {
                return Some(Self::ZERO);
            }
            mantissa = round_half_away(mantissa, 10i128.pow(excess as u32));
            scale = max_scale;
        }

        Self::new(mantissa, u8::try_from(scale).ok()?)
    }

    fn normalized(mut self) -> Self {
        if self.mantissa == 0 {
            return Self::ZERO;
        }
        while self.scale > 0 && self.mantissa % 10 == 0 {
            self.mantissa /= 10;
            self.scale -= 1;
        }
        self
    }
}

fn round_half_away(value: i128, divisor: i128) -> i128 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder.abs() * 2 >= divisor {
        quotient + value.signum()
    } else {
        quotient
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self { Self::from_i64(value) }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = usize::from(self.scale);
        let sign = if self.mantissa < 0 { "-" } else { "" };

        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }

        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int, frac) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int}.{frac}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalizes_trailing_zeros() {
        assert_eq!(Decimal::new(150, 2), Decimal::new(15, 1));
        assert_eq!(Decimal::new(0, 5), Some(Decimal::ZERO));
    }

    #[test]
    fn rejects_out_of_range_parts() {
        assert!(Decimal::new(1, 29).is_none());
        assert!(Decimal::new(MANTISSA_LIMIT, 0).is_none());
        assert!(Decimal::new(-MANTISSA_LIMIT, 0).is_none());
        assert!(Decimal::new(i128::MIN, 0).is_none());
        assert!(Decimal::new(-MANTISSA_LIMIT + 1, 0).is_some());
    }

    #[test]
    fn display() {
        assert_eq!(Decimal::new(-1234, 2).unwrap().to_string(), "-12.34");
        assert_eq!(Decimal::new(5, 3).unwrap().to_string(), "0.005");
        assert_eq!(Decimal::from_i64(42).to_string(), "42");
    }

    #[test]
    fn from_f64_keeps_fifteen_digits() {
        assert_eq!(Decimal::from_f64(12.34), Decimal::new(1234, 2));
        assert_eq!(Decimal::from_f64(-0.5), Decimal::new(-5, 1));
        assert_eq!(Decimal::from_f64(1e20), Decimal::new(10i128.pow(20), 0));
        assert_eq!(Decimal::from_f64(0.1 + 0.2), Decimal::new(3, 1));
    }

    #[test]
    fn from_f64_rejects_unrepresentable() {
        assert!(Decimal::from_f64(f64::NAN).is_none());
        assert!(Decimal::from_f64(f64::INFINITY).is_none());
        assert!(Decimal::from_f64(1e30).is_none());
        assert_eq!(Decimal::from_f64(1e-40), Some(Decimal::ZERO));
    }

    #[test]
    fn high_precision_is_lossy() {
        let precise = Decimal::new(1_234_567_890_123_456_789, 9).unwrap();
        let back = Decimal::from_f64(precise.to_f64()).unwrap();
        assert_ne!(precise, back);
        assert_eq!(back, Decimal::new(123_456_789_012_346, 5).unwrap());
    }
}
