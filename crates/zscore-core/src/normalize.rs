//! # Deficit Normalisation
//!
//! Brings every test onto one direction: negative always means deficit.
//!
//! - Performance tests (higher raw score is better) are already oriented.
//! - Time tests (lower completion time is better) report slow results as
//!   positive Z-scores; those are folded to `-|z|`. Fast results stay as they
//!   are.

use crate::types::{CognitiveTest, TestKind, ZScoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Orient a raw Z-score so that negative means deficit.
#[must_use]
pub fn normalize_for_deficit(z_score: f64, kind: TestKind) -> f64 {
    match kind {
        TestKind::Performance => z_score,
        TestKind::Time => {
            if z_score > 0.0 {
                -z_score.abs()
            } else {
                z_score
            }
        }
    }
}

/// Look up a test by name and normalise its score.
pub fn normalize_named(z_score: f64, test_name: &str) -> Result<f64, ZScoreError> {
    let test = CognitiveTest::from_name(test_name)?;
    Ok(normalize_for_deficit(z_score, test.kind()))
}

/// Raw Z-scores of one assessment. Absent results are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScores {
    #[serde(default)]
    pub digit_span: Option<f64>,
    #[serde(default)]
    pub meem: Option<f64>,
    #[serde(default)]
    pub clock_drawing: Option<f64>,
    #[serde(default)]
    pub tmt_a: Option<f64>,
    #[serde(default)]
    pub tmt_b: Option<f64>,
    #[serde(default)]
    pub stroop: Option<f64>,
}

impl AssessmentScores {
    /// Raw score for one test.
    #[must_use]
    pub fn get(&self, test: CognitiveTest) -> Option<f64> {
        match test {
            CognitiveTest::DigitSpan => self.digit_span,
            CognitiveTest::Meem => self.meem,
            CognitiveTest::ClockDrawing => self.clock_drawing,
            CognitiveTest::TmtA => self.tmt_a,
            CognitiveTest::TmtB => self.tmt_b,
            CognitiveTest::Stroop => self.stroop,
        }
    }

    pub fn set(&mut self, test: CognitiveTest, z_score: Option<f64>) {
        let slot = match test {
            CognitiveTest::DigitSpan => &mut self.digit_span,
            CognitiveTest::Meem => &mut self.meem,
            CognitiveTest::ClockDrawing => &mut self.clock_drawing,
            CognitiveTest::TmtA => &mut self.tmt_a,
            CognitiveTest::TmtB => &mut self.tmt_b,
            CognitiveTest::Stroop => &mut self.stroop,
        };
        *slot = z_score;
    }
}

/// Normalise every present result of an assessment.
#[must_use]
pub fn normalize_assessment(scores: &AssessmentScores) -> BTreeMap<CognitiveTest, f64> {
    CognitiveTest::ALL
        .into_iter()
        .filter_map(|test| {
            scores
                .get(test)
                .map(|z| (test, normalize_for_deficit(z, test.kind())))
        })
        .collect()
}

/// Mean of the normalised scores, `0.0` when there are none.
#[must_use]
pub fn composite_z_score(normalized: &BTreeMap<CognitiveTest, f64>) -> f64 {
    if normalized.is_empty() {
        return 0.0;
    }
    normalized.values().sum::<f64>() / normalized.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn performance_scores_pass_through() {
        assert!((normalize_for_deficit(-1.5, TestKind::Performance) + 1.5).abs() < 1e-12);
        assert!((normalize_for_deficit(1.5, TestKind::Performance) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn slow_time_results_become_deficits() {
        assert!((normalize_for_deficit(2.0, TestKind::Time) + 2.0).abs() < 1e-12);
    }

    #[test]
    fn fast_time_results_are_kept() {
        assert!((normalize_for_deficit(-0.5, TestKind::Time) + 0.5).abs() < 1e-12);
        assert!(normalize_for_deficit(0.0, TestKind::Time).abs() < 1e-12);
    }

    #[test]
    fn normalize_by_name() {
        assert!((normalize_named(1.2, "tmt_b").expect("known") + 1.2).abs() < 1e-12);
        assert!((normalize_named(1.2, "meem").expect("known") - 1.2).abs() < 1e-12);
        assert!(matches!(
            normalize_named(1.0, "moca"),
            Err(ZScoreError::UnknownTest(_))
        ));
    }

    #[test]
    fn assessment_skips_missing_results() {
        let scores = AssessmentScores {
            digit_span: Some(-1.0),
            tmt_a: Some(1.5),
            stroop: None,
            ..AssessmentScores::default()
        };
        let normalized = normalize_assessment(&scores);

        assert_eq!(normalized.len(), 2);
        assert!((normalized[&CognitiveTest::DigitSpan] + 1.0).abs() < 1e-12);
        assert!((normalized[&CognitiveTest::TmtA] + 1.5).abs() < 1e-12);
        assert!(!normalized.contains_key(&CognitiveTest::Stroop));
    }

    #[test]
    fn composite_is_mean() {
        let scores = AssessmentScores {
            meem: Some(-1.0),
            clock_drawing: Some(0.0),
            tmt_b: Some(2.0),
            ..AssessmentScores::default()
        };
        let composite = composite_z_score(&normalize_assessment(&scores));
        assert!((composite + 1.0).abs() < 1e-12);
    }

    #[test]
    fn composite_of_nothing_is_zero() {
        assert!(composite_z_score(&BTreeMap::new()).abs() < f64::EPSILON);
    }

    #[test]
    fn assessment_json_allows_missing_fields() {
        let scores: AssessmentScores =
            serde_json::from_str(r#"{"meem": -0.8, "stroop": null}"#).expect("parse");
        assert_eq!(scores.meem, Some(-0.8));
        assert_eq!(scores.stroop, None);
        assert_eq!(scores.tmt_a, None);
    }
}
