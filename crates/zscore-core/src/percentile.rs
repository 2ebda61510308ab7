//! # Percentile Approximation
//!
//! Standard normal CDF via Abramowitz & Stegun 7.1.26, expressed as a
//! percentage. Maximum absolute error of the underlying erf approximation is
//! about 1.5e-7.
//!
//! The evaluation order of [`cdf`] is fixed: reordering the Horner steps or
//! the final scaling changes the last bits of the result and therefore the
//! two-decimal rounding at band edges.

use crate::primitives::{CDF_A1, CDF_A2, CDF_A3, CDF_A4, CDF_A5, CDF_P};

/// Cumulative probability `P(Z <= score)` in [0, 1], unrounded.
///
/// NaN propagates. `-0.0` is treated as non-negative.
#[must_use]
pub fn cdf(score: f64) -> f64 {
    let sign = if score >= 0.0 { 1.0 } else { -1.0 };
    let x = score.abs() / 2.0_f64.sqrt();

    let t = 1.0 / (1.0 + CDF_P * x);
    let y = 1.0 - (((((CDF_A5 * t + CDF_A4) * t) + CDF_A3) * t + CDF_A2) * t + CDF_A1)
        * t
        * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

/// Percentile of `score` in [0, 100], rounded to two decimals.
#[must_use]
pub fn percentile(score: f64) -> f64 {
    (cdf(score) * 100.0 * 100.0).round() / 100.0
}

/// Percentile rounded to a whole number and clamped to [0, 100].
///
/// Uses the same A&S approximation as [`percentile`] and rounds half away
/// from zero. An exact-erf percentile rounded half to even can differ only
/// when the exact value lies within about 1.5e-5 of a `.5` boundary; no
/// two-decimal Z-score in [-4, 4] hits that window.
///
/// Returns 0 for NaN.
#[must_use]
pub fn whole_percentile(score: f64) -> u8 {
    let value = (cdf(score) * 100.0).round();
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0) as u8
}
