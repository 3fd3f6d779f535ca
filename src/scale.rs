//! Q8.8 fixed-point scale factor.
//!
//! The hardware takes its scale as a 32-bit register whose low 16 bits are a
//! Q8.8 value: 8 integer bits, 8 fractional bits. `0x0100` is 1.0, `0x0080`
//! is 0.5.

use core::fmt;
use core::str::FromStr;

/// Number of fractional bits in a [`Scale`].
pub const FRAC_BITS: u32 = 8;

/// Raw value of 1.0 in Q8.8.
pub const ONE_Q: u32 = 1 << FRAC_BITS;

/// Non-negative Q8.8 scale factor, stored as the raw register value.
///
/// ```
/// use fixscale::Scale;
///
/// let s: Scale = "0x00000080".parse().unwrap();
/// assert_eq!(s, Scale::HALF);
/// assert_eq!(s.to_f64(), 0.5);
/// assert_eq!(s.to_string(), "0x00000080");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Scale(u32);

impl Scale {
    /// 1.0 (identity).
    pub const ONE: Self = Self(ONE_Q);
    /// 0.75.
    pub const THREE_QUARTERS: Self = Self(0x00C0);
    /// 0.5.
    pub const HALF: Self = Self(0x0080);
    /// 0.25.
    pub const QUARTER: Self = Self(0x0040);
    /// Degenerate zero scale. Accepted everywhere; never divides.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw Q8.8 register value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw Q8.8 register value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Nearest Q8.8 value to a real ratio. Negative and NaN inputs give zero.
    pub fn from_f64(ratio: f64) -> Self {
        if ratio.is_nan() || ratio <= 0.0 {
            return Self::ZERO;
        }
        let raw = num_traits::Float::floor(ratio * ONE_Q as f64 + 0.5);
        Self(if raw >= u32::MAX as f64 { u32::MAX } else { raw as u32 })
    }

    /// The scale as a real ratio (`raw / 256`).
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_Q as f64
    }

    /// Whether this is the zero scale.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether this scale shrinks or keeps the image (`0 < scale <= 1.0`).
    pub const fn is_downscale(self) -> bool {
        self.0 != 0 && self.0 <= ONE_Q
    }

    /// Q8.8 reciprocal as the hardware computes it: `65536 / raw`, truncated.
    ///
    /// A zero scale yields 1.0 (`0x0100`), the same default the core latches.
    pub const fn reciprocal(self) -> u32 {
        if self.0 == 0 {
            ONE_Q
        } else {
            (ONE_Q * ONE_Q) / self.0
        }
    }
}

impl From<u32> for Scale {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Scale> for u32 {
    fn from(s: Scale) -> Self {
        s.0
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Error from parsing a [`Scale`] from text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScaleParseError {
    /// The input was empty (or only a `0x` prefix).
    Empty,
    /// The input contained a character that is not a digit in its radix.
    InvalidDigit,
    /// The value does not fit in 32 bits.
    Overflow,
}

impl fmt::Display for ScaleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty scale value"),
            Self::InvalidDigit => f.write_str("invalid digit in scale value"),
            Self::Overflow => f.write_str("scale value does not fit in 32 bits"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScaleParseError {}

impl FromStr for Scale {
    type Err = ScaleParseError;

    /// Parse `0x`-prefixed hex (the driver's form) or a plain decimal raw value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => (hex, 16),
            None => (s, 10),
        };
        if digits.is_empty() {
            return Err(ScaleParseError::Empty);
        }
        let mut value: u32 = 0;
        for c in digits.chars() {
            let d = c.to_digit(radix).ok_or(ScaleParseError::InvalidDigit)?;
            value = value
                .checked_mul(radix)
                .and_then(|v| v.checked_add(d))
                .ok_or(ScaleParseError::Overflow)?;
        }
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn parse_hex_and_decimal() {
        assert_eq!("0x00000080".parse::<Scale>(), Ok(Scale::HALF));
        assert_eq!("0XC0".parse::<Scale>(), Ok(Scale::THREE_QUARTERS));
        assert_eq!(" 256 ".parse::<Scale>(), Ok(Scale::ONE));
        assert_eq!("0x".parse::<Scale>(), Err(ScaleParseError::Empty));
        assert_eq!("0x12g".parse::<Scale>(), Err(ScaleParseError::InvalidDigit));
        assert_eq!("0x100000000".parse::<Scale>(), Err(ScaleParseError::Overflow));
    }

    #[test]
    fn display_is_register_hex() {
        assert_eq!(Scale::QUARTER.to_string(), "0x00000040");
        assert_eq!(Scale::from_raw(0xdead_beef).to_string(), "0xdeadbeef");
    }

    #[test]
    fn reciprocal_matches_core() {
        assert_eq!(Scale::ONE.reciprocal(), 0x0100);
        assert_eq!(Scale::HALF.reciprocal(), 0x0200);
        assert_eq!(Scale::THREE_QUARTERS.reciprocal(), 341);
        assert_eq!(Scale::QUARTER.reciprocal(), 0x0400);
        assert_eq!(Scale::ZERO.reciprocal(), 0x0100);
    }

    #[test]
    fn from_f64_rounds_to_nearest() {
        assert_eq!(Scale::from_f64(0.5), Scale::HALF);
        assert_eq!(Scale::from_f64(0.75), Scale::THREE_QUARTERS);
        assert_eq!(Scale::from_f64(1.0 / 3.0), Scale::from_raw(85));
        assert_eq!(Scale::from_f64(-1.0), Scale::ZERO);
        assert_eq!(Scale::from_f64(f64::NAN), Scale::ZERO);
    }

    #[test]
    fn downscale_range() {
        assert!(Scale::ONE.is_downscale());
        assert!(Scale::QUARTER.is_downscale());
        assert!(!Scale::ZERO.is_downscale());
        assert!(!Scale::from_raw(0x0101).is_downscale());
    }
}
