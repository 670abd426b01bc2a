#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::constants::{GRADE_LADDER, SGPA_DECIMALS};

/// A grade point between 0 and 10 earned for a single subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradePoint(u8);

impl GradePoint {
    /// Maps a mark onto the grade ladder.
    ///
    /// | mark >= | grade point |
    /// |---------|-------------|
    /// | 90      | 10          |
    /// | 75      | 9           |
    /// | 65      | 8           |
    /// | 55      | 7           |
    /// | 50      | 6           |
    /// | 45      | 5           |
    /// | 40      | 4           |
    /// | else    | 0           |
    ///
    /// Defined for every `f64`: values above 100 still earn 10, and negative
    /// values as well as NaN earn 0.
    pub fn from_mark(mark: f64) -> Self {
        GRADE_LADDER
            .iter()
            .find(|(threshold, _)| mark >= *threshold)
            .map(|&(_, points)| GradePoint(points))
            .unwrap_or_default()
    }

    /// Returns the grade point as a plain integer.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<GradePoint> for f64 {
    fn from(gp: GradePoint) -> Self {
        f64::from(gp.0)
    }
}

impl Display for GradePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convenience wrapper around [`GradePoint::from_mark`].
pub fn grade_point(mark: f64) -> GradePoint {
    GradePoint::from_mark(mark)
}

/// Replaces marks that cannot take part in arithmetic with 0.
pub fn effective_mark(mark: Option<f64>) -> f64 {
    match mark {
        Some(m) if !m.is_nan() => m,
        _ => 0.0,
    }
}

/// Splits a finite, non-negative float into `mantissa * 2^exponent`.
fn decompose(value: f64) -> (u64, i32) {
    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    if exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent - 1075)
    }
}

/// Rounds an average to the number of decimals an SGPA is reported with.
///
/// The decision is made on the exact binary value, halves away from zero:
/// `4.175` is stored as `4.17499...` and rounds to `4.17`, while `8.125` is
/// exact and rounds to `8.13`. Scaling by 100 first and calling `round`
/// would let the multiplication itself land on a half.
pub fn round_sgpa(value: f64) -> f64 {
    let (mantissa, exponent) = decompose(value.abs());
    if !value.is_finite() || exponent >= 0 {
        return value;
    }

    let factor = 10f64.powi(SGPA_DECIMALS);
    let lower = (value.abs() * factor).floor();
    let shift = exponent.unsigned_abs();
    // |value| >= (lower + 0.5) / factor  <=>  2 * factor * |value| >= 2 * lower + 1
    let half_or_more = shift < 100 && {
        let scale = 2 * 10u128.pow(SGPA_DECIMALS.unsigned_abs());
        scale * u128::from(mantissa) >= (2 * lower as u128 + 1) << shift
    };
    let rounded = if half_or_more { lower + 1.0 } else { lower };
    (rounded / factor).copysign(value)
}

/// A credit-weighted average of grade points, rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sgpa(f64);

impl Sgpa {
    /// Builds an SGPA from a weighted sum and the credits it was weighted by.
    /// No credits yields exactly 0.
    pub fn from_totals(weighted_sum: f64, total_credits: u64) -> Self {
        if total_credits == 0 {
            return Sgpa(0.0);
        }
        Sgpa(round_sgpa(weighted_sum / total_credits as f64))
    }

    /// Returns the SGPA as a float.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Display for Sgpa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
