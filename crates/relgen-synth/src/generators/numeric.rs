//! Numeric value generators.

use crate::error::{Result, SynthError};
use rand::Rng;
use relgen_core::Value;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest number of digits an exact decimal can carry.
pub const MAX_DECIMAL_DIGITS: u8 = 28;

/// Bounds of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerBounds {
    /// Storage width in bits
    pub bits: u32,
    /// Whether the type admits negative values
    pub negative_allowed: bool,
    /// Inclusive lower bound from validators
    pub min: Option<i64>,
    /// Inclusive upper bound from validators
    pub max: Option<i64>,
    /// Values must be multiples of this
    pub step: i64,
}

impl IntegerBounds {
    /// Unconstrained bounds for a type width.
    pub fn new(bits: u32, negative_allowed: bool) -> Self {
        Self {
            bits,
            negative_allowed,
            min: None,
            max: None,
            step: 1,
        }
    }
}

/// Sample an offset in `[0, span]` with a log-scale bias towards zero.
///
/// The bit length of the result is roughly uniform, so small offsets are far
/// more likely than offsets near `span`.
pub fn generate_positive_log<R: Rng + ?Sized>(rng: &mut R, span: i128) -> i128 {
    if span <= 0 {
        return 0;
    }
    let scaled = ((span as f64 + 1.0).ln() * rng.random::<f64>()).exp().round() as i128;
    (scaled - 1).clamp(0, span)
}

/// Generate an integer within the type width and validator bounds.
///
/// A sign is picked first when both signs are admissible, then the magnitude
/// is sampled with [`generate_positive_log`]. Signed types cover
/// `[-2^(bits-1), 2^(bits-1) - 1]`, non-negative types `[0, 2^(bits-1) - 1]`.
pub fn generate_integer<R: Rng + ?Sized>(rng: &mut R, bounds: IntegerBounds) -> Result<i64> {
    let IntegerBounds {
        bits,
        negative_allowed,
        min,
        max,
        step,
    } = bounds;
    if !(1..=64).contains(&bits) {
        return Err(SynthError::inconsistent(format!(
            "integer width must be between 1 and 64 bits, got {bits}"
        )));
    }
    if step <= 0 {
        return Err(SynthError::inconsistent(format!(
            "integer step must be positive, got {step}"
        )));
    }
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(SynthError::inconsistent(format!(
                "integer minimum {lo} exceeds maximum {hi}"
            )));
        }
    }

    let step = i128::from(step);
    let type_max = (1i128 << (bits - 1)) - 1;
    let type_min = -(1i128 << (bits - 1));
    let min = min.map(i128::from);
    let max = max.map(i128::from);

    let positive_allowed = max.map_or(true, |mx| floor_div(mx, step) >= 0);
    let negative_allowed = negative_allowed && min.map_or(true, |mn| ceil_div(mn, step) < 0);
    let positive = match (positive_allowed, negative_allowed) {
        (true, true) => rng.random_bool(0.5),
        (true, false) => true,
        (false, true) => false,
        (false, false) => {
            return Err(SynthError::inconsistent(
                "no integer satisfies the given constraints",
            ))
        }
    };

    let value = if positive {
        let hi = floor_div(max.unwrap_or(type_max).min(type_max), step);
        let lo = ceil_div(min.unwrap_or(0).max(0), step);
        if lo > hi {
            return Err(SynthError::inconsistent(
                "no non-negative integer satisfies the given constraints",
            ));
        }
        (generate_positive_log(rng, hi - lo) + lo) * step
    } else {
        let hi = floor_div(max.unwrap_or(-1).min(-1), step);
        let lo = ceil_div(min.unwrap_or(type_min).max(type_min), step);
        if lo > hi {
            return Err(SynthError::inconsistent(
                "no negative integer satisfies the given constraints",
            ));
        }
        (hi - generate_positive_log(rng, hi - lo)) * step
    };

    i64::try_from(value)
        .map_err(|_| SynthError::inconsistent(format!("integer {value} does not fit 64 bits")))
}

fn floor_div(a: i128, b: i128) -> i128 {
    a.div_euclid(b)
}

fn ceil_div(a: i128, b: i128) -> i128 {
    -(-a).div_euclid(b)
}

/// Generate a boolean.
pub fn generate_boolean<R: Rng + ?Sized>(rng: &mut R) -> Value {
    Value::Bool(rng.random_bool(0.5))
}

/// Build the textual form of a random decimal.
///
/// The integer part has up to `max_digits - decimal_places` digits without a
/// leading zero, the fractional part between 1 and `decimal_places` digits.
/// Half of the values that leave room for a sign are negated.
pub fn decimal_digits<R: Rng + ?Sized>(
    rng: &mut R,
    max_digits: u8,
    decimal_places: u8,
) -> Result<String> {
    if decimal_places > max_digits || max_digits == 0 {
        return Err(SynthError::inconsistent(format!(
            "decimal with {max_digits} digits cannot have {decimal_places} decimal places"
        )));
    }

    let integer_len = rng.random_range(0..=usize::from(max_digits - decimal_places));
    let mut res = String::with_capacity(usize::from(max_digits) + 2);
    for idx in 0..integer_len {
        let first = if idx == 0 { 1 } else { 0 };
        res.push(random_digit(rng, first));
    }
    if res.is_empty() {
        res.push('0');
    }
    if decimal_places > 0 {
        res.push('.');
        for _ in 0..rng.random_range(1..=usize::from(decimal_places)) {
            res.push(random_digit(rng, 0));
        }
    }
    if res.len() < usize::from(max_digits) + 1 && rng.random::<f64>() < 0.5 {
        res.insert(0, '-');
    }
    Ok(res)
}

fn random_digit<R: Rng + ?Sized>(rng: &mut R, lowest: u32) -> char {
    char::from_digit(rng.random_range(lowest..10), 10).unwrap_or('0')
}

/// Generate an exact decimal honoring precision and scale.
pub fn generate_decimal<R: Rng + ?Sized>(
    rng: &mut R,
    max_digits: u8,
    decimal_places: u8,
) -> Result<Decimal> {
    if max_digits > MAX_DECIMAL_DIGITS {
        return Err(SynthError::inconsistent(format!(
            "decimals are limited to {MAX_DECIMAL_DIGITS} digits, got {max_digits}"
        )));
    }
    let digits = decimal_digits(rng, max_digits, decimal_places)?;
    Decimal::from_str(&digits)
        .map_err(|e| SynthError::inconsistent(format!("decimal '{digits}': {e}")))
}

/// Generate a float from a wide random decimal expansion.
pub fn generate_float<R: Rng + ?Sized>(rng: &mut R) -> Result<f64> {
    let digits = decimal_digits(rng, 30, 20)?;
    digits
        .parse::<f64>()
        .map_err(|e| SynthError::inconsistent(format!("float '{digits}': {e}")))
}

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> Value {
    Value::Int(rng.random_range(min..=max))
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Value {
    Value::Float(rng.random_range(min..=max))
}
