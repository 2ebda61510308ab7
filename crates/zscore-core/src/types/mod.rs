//! # Core Type Definitions
//!
//! This module contains the shared types of the Z-score engine:
//! - Risk bands (`RiskBand`) and the derived `Classification`
//! - Test identities (`CognitiveTest`, `TestKind`)
//! - Error types (`ZScoreError`)

use crate::primitives::{
    COLOR_CRITICAL, COLOR_HIGH, COLOR_LOW, COLOR_MINIMAL, COLOR_MODERATE, CRITICAL_THRESHOLD,
    HIGH_THRESHOLD, LOW_THRESHOLD, MODERATE_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// RISK BAND
// =============================================================================

/// One row of the classification table.
///
/// Variants are declared most-severe-first, which is also the order the
/// table is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Critical,
    High,
    Moderate,
    Low,
    Minimal,
}

impl RiskBand {
    /// All bands, most severe first.
    pub const ALL: [RiskBand; 5] = [
        RiskBand::Critical,
        RiskBand::High,
        RiskBand::Moderate,
        RiskBand::Low,
        RiskBand::Minimal,
    ];

    /// Display colour as a CSS hex token.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            RiskBand::Critical => COLOR_CRITICAL,
            RiskBand::High => COLOR_HIGH,
            RiskBand::Moderate => COLOR_MODERATE,
            RiskBand::Low => COLOR_LOW,
            RiskBand::Minimal => COLOR_MINIMAL,
        }
    }

    /// Display label (pt-BR).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RiskBand::Critical => "Crítico",
            RiskBand::High => "Alto",
            RiskBand::Moderate => "Moderado",
            RiskBand::Low => "Baixo",
            RiskBand::Minimal => "Mínimo",
        }
    }

    /// Inclusive upper bound of the band, `None` for the open-ended `Minimal`.
    #[must_use]
    pub const fn upper_bound(self) -> Option<f64> {
        match self {
            RiskBand::Critical => Some(CRITICAL_THRESHOLD),
            RiskBand::High => Some(HIGH_THRESHOLD),
            RiskBand::Moderate => Some(MODERATE_THRESHOLD),
            RiskBand::Low => Some(LOW_THRESHOLD),
            RiskBand::Minimal => None,
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Everything the presentation layer needs for one score.
///
/// Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub score: f64,
    pub band: RiskBand,
    pub color: String,
    pub label: String,
    /// CDF value as 0–100, two decimals.
    pub percentile: f64,
}

// =============================================================================
// TEST IDENTITIES
// =============================================================================

/// Direction of a test's raw scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Higher raw score is better (Digit Span, MEEM, Clock Drawing).
    Performance,
    /// Lower completion time is better (TMT, Stroop).
    Time,
}

impl TestKind {
    /// Parse `"performance"` or `"time"`.
    pub fn from_name(name: &str) -> Result<Self, ZScoreError> {
        match name {
            "performance" => Ok(TestKind::Performance),
            "time" => Ok(TestKind::Time),
            other => Err(ZScoreError::InvalidTestKind(other.to_string())),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TestKind::Performance => "performance",
            TestKind::Time => "time",
        }
    }
}

/// The cognitive tests the assessment battery reports Z-scores for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveTest {
    DigitSpan,
    Meem,
    ClockDrawing,
    TmtA,
    TmtB,
    Stroop,
}

impl CognitiveTest {
    pub const ALL: [CognitiveTest; 6] = [
        CognitiveTest::DigitSpan,
        CognitiveTest::Meem,
        CognitiveTest::ClockDrawing,
        CognitiveTest::TmtA,
        CognitiveTest::TmtB,
        CognitiveTest::Stroop,
    ];

    /// Look a test up by its snake_case name.
    pub fn from_name(name: &str) -> Result<Self, ZScoreError> {
        Self::ALL
            .into_iter()
            .find(|test| test.name() == name)
            .ok_or_else(|| ZScoreError::UnknownTest(name.to_string()))
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CognitiveTest::DigitSpan => "digit_span",
            CognitiveTest::Meem => "meem",
            CognitiveTest::ClockDrawing => "clock_drawing",
            CognitiveTest::TmtA => "tmt_a",
            CognitiveTest::TmtB => "tmt_b",
            CognitiveTest::Stroop => "stroop",
        }
    }

    /// Direction of this test's raw scale.
    #[must_use]
    pub const fn kind(self) -> TestKind {
        match self {
            CognitiveTest::DigitSpan | CognitiveTest::Meem | CognitiveTest::ClockDrawing => {
                TestKind::Performance
            }
            CognitiveTest::TmtA | CognitiveTest::TmtB | CognitiveTest::Stroop => TestKind::Time,
        }
    }
}

impl fmt::Display for CognitiveTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the fallible surfaces of the engine.
///
/// Classification and percentile never fail; these cover name lookups,
/// input validation at the boundaries, and (de)serialization.
#[derive(Debug, Error)]
pub enum ZScoreError {
    /// A test name outside the known battery.
    #[error("Unknown test: {0}")]
    UnknownTest(String),

    /// A test kind other than `performance` or `time`.
    #[error("Invalid test kind: {0}. Use 'performance' or 'time'")]
    InvalidTestKind(String),

    /// A score that is not a finite number.
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    /// A chart preset name that does not exist.
    #[error("Unknown chart preset: {0}")]
    UnknownPreset(String),

    /// The normative table has no entry for a test, age group and education group.
    #[error("No normative data for {0}")]
    MissingNorm(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Reject NaN and infinities at input boundaries.
pub fn ensure_finite(score: f64) -> Result<f64, ZScoreError> {
    if score.is_finite() {
        Ok(score)
    } else {
        Err(ZScoreError::InvalidScore(score.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_colors_are_distinct() {
        let mut colors: Vec<_> = RiskBand::ALL.iter().map(|b| b.color()).collect();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), 5);
    }

    #[test]
    fn only_minimal_is_open_ended() {
        for band in RiskBand::ALL {
            assert_eq!(band.upper_bound().is_none(), band == RiskBand::Minimal);
        }
    }

    #[test]
    fn band_serializes_snake_case() {
        let json = serde_json::to_string(&RiskBand::Critical).expect("serialize");
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(TestKind::from_name("time").expect("time"), TestKind::Time);
        assert!(matches!(
            TestKind::from_name("speed"),
            Err(ZScoreError::InvalidTestKind(_))
        ));
    }

    #[test]
    fn cognitive_test_lookup_round_trips_names() {
        for test in CognitiveTest::ALL {
            assert_eq!(CognitiveTest::from_name(test.name()).expect("known"), test);
        }
        assert!(matches!(
            CognitiveTest::from_name("moca"),
            Err(ZScoreError::UnknownTest(_))
        ));
    }

    #[test]
    fn cognitive_test_kinds() {
        assert_eq!(CognitiveTest::Meem.kind(), TestKind::Performance);
        assert_eq!(CognitiveTest::Stroop.kind(), TestKind::Time);
    }

    #[test]
    fn ensure_finite_rejects_nan() {
        assert!(ensure_finite(1.2).is_ok());
        assert!(ensure_finite(f64::NAN).is_err());
        assert!(ensure_finite(f64::NEG_INFINITY).is_err());
    }
}
