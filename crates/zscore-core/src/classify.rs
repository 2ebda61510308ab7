//! # Classification
//!
//! Maps a Z-score onto one of five risk bands.
//!
//! The table is evaluated most-negative-first and the first matching row
//! wins. Bounds are inclusive, so a score exactly on a threshold belongs to
//! the more severe band.
//!
//! | condition      | band       | colour  | label      |
//! |----------------|------------|---------|------------|
//! | score <= -2.5  | Critical   | #6f42c1 | Crítico    |
//! | score <= -1.5  | High       | #dc3545 | Alto       |
//! | score <= -1.0  | Moderate   | #fd7e14 | Moderado   |
//! | score <= -0.5  | Low        | #ffc107 | Baixo      |
//! | otherwise      | Minimal    | #28a745 | Mínimo     |
//!
//! Input is not guarded. NaN fails every comparison and lands in `Minimal`.

use crate::percentile::percentile;
use crate::types::{Classification, RiskBand};

/// Classify a score into its risk band.
#[must_use]
pub fn classify(score: f64) -> RiskBand {
    RiskBand::ALL
        .into_iter()
        .find(|band| band.upper_bound().is_some_and(|bound| score <= bound))
        .unwrap_or(RiskBand::Minimal)
}

/// Display colour for a score.
#[must_use]
pub fn color(score: f64) -> &'static str {
    classify(score).color()
}

/// Display label for a score.
#[must_use]
pub fn label(score: f64) -> &'static str {
    classify(score).label()
}

/// Band, colour, label and percentile in one value.
#[must_use]
pub fn describe(score: f64) -> Classification {
    let band = classify(score);
    Classification {
        score,
        band,
        color: band.color().to_string(),
        label: band.label().to_string(),
        percentile: percentile(score),
    }
}
