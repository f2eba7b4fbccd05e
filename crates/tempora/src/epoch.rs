//! Numeric epoch values: integer, floating point and exact decimal seconds.

use std::fmt;
use std::str::FromStr;

use crate::error::TemporalError;
use crate::value::{MAX_TIMESTAMP, MIN_TIMESTAMP};

/// A count of seconds since `1970-01-01T00:00:00Z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Epoch {
    Int(i64),
    /// Fractions are rounded to the nearest microsecond; an `f64` carries
    /// no more precision than that for present-day timestamps.
    Float(f64),
    /// Exact; fractions beyond nanoseconds are truncated toward the past.
    Decimal(Decimal),
}

impl Epoch {
    /// Split into whole seconds and nanoseconds with floor semantics, so
    /// `-1.5` becomes `(-2, 500_000_000)`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NumericRange`] for non-finite floats and for
    /// magnitudes that do not fit the representable range.
    pub fn to_parts(&self) -> Result<(i64, u32), TemporalError> {
        match *self {
            Epoch::Int(seconds) => Ok((seconds, 0)),
            Epoch::Float(value) => float_parts(value),
            Epoch::Decimal(decimal) => decimal.to_parts(),
        }
    }
}

fn out_of_range(value: impl fmt::Display) -> TemporalError {
    TemporalError::NumericRange(format!("epoch value {value} is outside the representable range"))
}

fn float_parts(value: f64) -> Result<(i64, u32), TemporalError> {
    if !value.is_finite() {
        return Err(TemporalError::NumericRange(format!(
            "epoch value {value} is not finite"
        )));
    }
    let floor = value.floor();
    if floor < MIN_TIMESTAMP as f64 || floor > MAX_TIMESTAMP as f64 {
        return Err(out_of_range(value));
    }
    let micros = ((value - floor) * 1e6).round() as u32;
    let (seconds, micros) = if micros >= 1_000_000 {
        (floor as i64 + 1, 0)
    } else {
        (floor as i64, micros)
    };
    Ok((seconds, micros * 1_000))
}

impl From<i64> for Epoch {
    fn from(value: i64) -> Self {
        Epoch::Int(value)
    }
}

impl From<i32> for Epoch {
    fn from(value: i32) -> Self {
        Epoch::Int(i64::from(value))
    }
}

impl From<u32> for Epoch {
    fn from(value: u32) -> Self {
        Epoch::Int(i64::from(value))
    }
}

impl From<f64> for Epoch {
    fn from(value: f64) -> Self {
        Epoch::Float(value)
    }
}

impl From<Decimal> for Epoch {
    fn from(value: Decimal) -> Self {
        Epoch::Decimal(value)
    }
}

// ── Decimal ─────────────────────────────────────────────────────────────────

/// Maximum number of significant digits an `i128` mantissa can hold.
const MAX_DIGITS: usize = 38;

/// An exact decimal number, `mantissa × 10^-scale`.
///
/// # Examples
///
/// ```
/// use tempora::Decimal;
///
/// let d: Decimal = "1672531200.123456789".parse().unwrap();
/// assert_eq!(d.mantissa(), 1_672_531_200_123_456_789);
/// assert_eq!(d.scale(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    /// # Errors
    ///
    /// Returns [`TemporalError::NumericRange`] if `scale` exceeds 38, the
    /// precision of the mantissa.
    pub fn new(mantissa: i128, scale: u32) -> Result<Self, TemporalError> {
        if scale as usize > MAX_DIGITS {
            return Err(TemporalError::NumericRange(format!(
                "decimal scale {scale} exceeds {MAX_DIGITS}"
            )));
        }
        Ok(Self { mantissa, scale })
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Whole seconds and nanoseconds, flooring toward negative infinity.
    pub fn to_parts(&self) -> Result<(i64, u32), TemporalError> {
        let unit = 10_i128.pow(self.scale);
        let whole = self.mantissa.div_euclid(unit);
        let frac = self.mantissa.rem_euclid(unit);
        let nanos = if self.scale <= 9 {
            frac * 10_i128.pow(9 - self.scale)
        } else {
            frac / 10_i128.pow(self.scale - 9)
        };
        let seconds = i64::try_from(whole).map_err(|_| out_of_range(self))?;
        // nanos < 10^9 by construction.
        Ok((seconds, nanos as u32))
    }
}

impl FromStr for Decimal {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TemporalError::ParserMatch(format!("'{s}' is not a decimal number"));
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let significant = format!("{int_part}{frac_part}");
        let significant = significant.trim_start_matches('0');
        if significant.len() > MAX_DIGITS || frac_part.len() > MAX_DIGITS {
            return Err(TemporalError::NumericRange(format!(
                "'{s}' has more than {MAX_DIGITS} significant digits"
            )));
        }
        let magnitude: i128 = if significant.is_empty() {
            0
        } else {
            significant.parse().map_err(|_| malformed())?
        };
        Ok(Self {
            mantissa: if negative { -magnitude } else { magnitude },
            scale: frac_part.len() as u32,
        })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let unit = 10_i128.pow(self.scale);
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let abs = self.mantissa.unsigned_abs();
        let unit = unit as u128;
        write!(
            f,
            "{sign}{}.{:0width$}",
            abs / unit,
            abs % unit,
            width = self.scale as usize
        )
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
