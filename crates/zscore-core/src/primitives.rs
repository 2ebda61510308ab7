//! # Fixed Primitives
//!
//! Compiled-in constants for the Z-score engine.
//!
//! None of these are configurable at runtime. Changing a threshold here
//! changes BOTH the classification table and the emphasised chart gridlines.

// =============================================================================
// CLASSIFICATION THRESHOLDS (inclusive upper bounds)
// =============================================================================

/// Scores at or below this are `Critical`.
pub const CRITICAL_THRESHOLD: f64 = -2.5;

/// Scores at or below this are `High`.
pub const HIGH_THRESHOLD: f64 = -1.5;

/// Scores at or below this are `Moderate`.
pub const MODERATE_THRESHOLD: f64 = -1.0;

/// Scores at or below this are `Low`. Anything above is `Minimal`.
pub const LOW_THRESHOLD: f64 = -0.5;

// =============================================================================
// BAND COLOURS
// =============================================================================

pub const COLOR_CRITICAL: &str = "#6f42c1";
pub const COLOR_HIGH: &str = "#dc3545";
pub const COLOR_MODERATE: &str = "#fd7e14";
pub const COLOR_LOW: &str = "#ffc107";
pub const COLOR_MINIMAL: &str = "#28a745";

// =============================================================================
// NORMAL CDF APPROXIMATION (Abramowitz & Stegun 7.1.26)
// =============================================================================

pub const CDF_A1: f64 = 0.254_829_592;
pub const CDF_A2: f64 = -0.284_496_736;
pub const CDF_A3: f64 = 1.421_413_741;
pub const CDF_A4: f64 = -1.453_152_027;
pub const CDF_A5: f64 = 1.061_405_429;
pub const CDF_P: f64 = 0.327_591_1;

// =============================================================================
// CHART AXIS
// =============================================================================

/// Lower bound of the bounded Z-score axis.
pub const AXIS_MIN: f64 = -3.0;

/// Upper bound of the bounded Z-score axis.
pub const AXIS_MAX: f64 = 3.0;

/// Tick spacing on the bounded Z-score axis.
pub const AXIS_STEP: f64 = 0.5;

/// Ticks closer than this to zero get the zero-line emphasis.
pub const ZERO_LINE_TOLERANCE: f64 = 0.1;

/// Gridlines drawn with the critical emphasis, mirrored around zero.
pub const CRITICAL_GRIDLINES: [f64; 8] = [-2.5, -1.5, -1.0, -0.5, 0.5, 1.0, 1.5, 2.5];

pub const GRID_COLOR_ZERO: &str = "#000000";
pub const GRID_COLOR_CRITICAL: &str = "#ff6b6b";
pub const GRID_COLOR_DEFAULT: &str = "rgba(0,0,0,0.1)";

pub const GRID_WIDTH_ZERO: f64 = 2.0;
pub const GRID_WIDTH_CRITICAL: f64 = 1.5;
pub const GRID_WIDTH_DEFAULT: f64 = 1.0;

// =============================================================================
// PAGE SELECTORS
// =============================================================================

/// Class carried by inline score elements.
pub const SCORE_VALUE_CLASS: &str = "z-score-value";

/// Class carried by per-test statistic cards.
pub const STAT_CARD_CLASS: &str = "test-stat-card";

/// Attribute holding an explicit score on an inline element.
pub const SCORE_ATTRIBUTE: &str = "data-score";

/// Attribute holding the average score inside a statistic card.
pub const AVG_SCORE_ATTRIBUTE: &str = "data-avg-score";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_ordered_most_negative_first() {
        assert!(CRITICAL_THRESHOLD < HIGH_THRESHOLD);
        assert!(HIGH_THRESHOLD < MODERATE_THRESHOLD);
        assert!(MODERATE_THRESHOLD < LOW_THRESHOLD);
    }

    #[test]
    fn critical_gridlines_are_symmetric() {
        for line in CRITICAL_GRIDLINES {
            assert!(CRITICAL_GRIDLINES.contains(&-line));
        }
    }
}
