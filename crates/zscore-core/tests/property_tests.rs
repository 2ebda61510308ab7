//! # Property-Based Tests
//!
//! Invariants of classification, percentile and normalisation, checked with
//! proptest over the realistic score range and beyond.

use proptest::prelude::*;
use zscore_core::{
    RiskBand, TestKind, classify, interpret, normalize_for_deficit, parse_float, percentile,
};

proptest! {
    /// Percentile never leaves [0, 100].
    #[test]
    fn percentile_is_bounded(score in -50.0f64..50.0) {
        let p = percentile(score);
        prop_assert!((0.0..=100.0).contains(&p));
    }

    /// Higher score never yields a lower percentile.
    #[test]
    fn percentile_is_monotonic(a in -4.0f64..4.0, b in -4.0f64..4.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(percentile(lo) <= percentile(hi));
    }

    /// percentile(-x) + percentile(x) = 100, up to one rounding step.
    #[test]
    fn percentile_is_symmetric(x in 0.0f64..6.0) {
        let sum = percentile(-x) + percentile(x);
        prop_assert!((sum - 100.0).abs() <= 0.01 + 1e-9, "sum = {}", sum);
    }

    /// Percentile carries at most two decimals.
    #[test]
    fn percentile_has_two_decimals(score in -3.0f64..3.0) {
        let scaled = percentile(score) * 100.0;
        prop_assert!((scaled - scaled.round()).abs() < 1e-6);
    }

    /// Every score at or below -2.5 is critical.
    #[test]
    fn deep_scores_are_critical(score in -100.0f64..=-2.5) {
        prop_assert_eq!(classify(score), RiskBand::Critical);
    }

    /// Every score above -0.5 is minimal.
    #[test]
    fn shallow_scores_are_minimal(score in -0.499_999f64..100.0) {
        prop_assert_eq!(classify(score), RiskBand::Minimal);
    }

    /// Bands never get less severe as the score drops.
    #[test]
    fn classification_is_monotonic(a in -4.0f64..4.0, b in -4.0f64..4.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo) <= classify(hi));
    }

    /// The chosen band actually contains the score.
    #[test]
    fn band_contains_score(score in -4.0f64..4.0) {
        let band = classify(score);
        if let Some(bound) = band.upper_bound() {
            prop_assert!(score <= bound);
        }
        let more_severe = RiskBand::ALL.iter().take_while(|b| **b != band);
        for other in more_severe {
            let bound = other.upper_bound().unwrap_or(f64::INFINITY);
            prop_assert!(score > bound);
        }
    }

    /// Normalised time scores are never positive.
    #[test]
    fn time_scores_never_positive(z in -10.0f64..10.0) {
        prop_assert!(normalize_for_deficit(z, TestKind::Time) <= 0.0);
    }

    /// Performance normalisation is the identity.
    #[test]
    fn performance_is_identity(z in -10.0f64..10.0) {
        prop_assert_eq!(normalize_for_deficit(z, TestKind::Performance).to_bits(), z.to_bits());
    }

    /// Interpretation never gets milder as the score drops.
    #[test]
    fn interpretation_is_monotonic(a in -4.0f64..4.0, b in -4.0f64..4.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(interpret(lo) >= interpret(hi));
    }

    /// Formatted finite numbers parse back to themselves.
    #[test]
    fn parse_float_reads_formatted_numbers(score in -1e6f64..1e6) {
        let text = format!("{}", score);
        prop_assert_eq!(parse_float(&text), Some(score));
    }

    /// Trailing non-numeric text does not change the parsed value.
    #[test]
    fn parse_float_ignores_suffix(score in -10.0f64..10.0, suffix in "[ a-zA-Z/%]{0,8}") {
        let text = format!("{:.2}{}", score, suffix);
        let expected: f64 = format!("{:.2}", score).parse().expect("formatted float");
        prop_assert_eq!(parse_float(&text), Some(expected));
    }
}
