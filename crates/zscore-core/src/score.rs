//! # Score Engine
//!
//! Raw test results to Z-scores against age and education norms, and the
//! final risk score of an assessment.
//!
//! ## Norms
//!
//! [`NormativeData`] is a serde table keyed test → age group → education
//! group, the same shape as a `normative_data.json` file:
//!
//! ```json
//! { "tmt_a": { "60-69": { "low_education": { "mean": 38.5, "sd": 15.2 } } } }
//! ```
//!
//! [`NormativeData::example`] is the built-in table. MEEM falls back to the
//! Brucki et al. (2003) estimates when the table has no `meem` entry, and the
//! Clock Drawing Test always uses its own fixed table.
//!
//! ## Risk
//!
//! The final risk is the mean of the raw Z-scores of every completed test:
//! `<= -2.0` critical, `<= -1.5` high, `<= -1.0` moderate, otherwise low.

use crate::normalize::AssessmentScores;
use crate::types::{CognitiveTest, ZScoreError, ensure_finite};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// MEEM norm for the high-education group when the table has none.
pub const MEEM_FALLBACK_HIGH_EDUCATION: Norm = Norm { mean: 28.5, sd: 1.8 };

/// MEEM norm for the low-education group when the table has none.
pub const MEEM_FALLBACK_LOW_EDUCATION: Norm = Norm { mean: 25.2, sd: 2.3 };

/// Years of schooling above which a patient counts as high education.
const HIGH_EDUCATION_MIN_YEARS: u32 = 8;

/// Years of schooling assumed by the clock table when none are recorded.
const CLOCK_DEFAULT_EDUCATION_YEARS: u32 = 8;

// =============================================================================
// PATIENT GROUPS
// =============================================================================

/// Age bracket of a norm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "50-59")]
    Fifties,
    #[serde(rename = "60-69")]
    Sixties,
    #[serde(rename = "70-79")]
    Seventies,
    /// Also every age below 50.
    #[serde(rename = "80+")]
    EightyPlus,
}

impl AgeGroup {
    #[must_use]
    pub const fn from_age(age: u32) -> Self {
        match age {
            50..=59 => AgeGroup::Fifties,
            60..=69 => AgeGroup::Sixties,
            70..=79 => AgeGroup::Seventies,
            _ => AgeGroup::EightyPlus,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AgeGroup::Fifties => "50-59",
            AgeGroup::Sixties => "60-69",
            AgeGroup::Seventies => "70-79",
            AgeGroup::EightyPlus => "80+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Education bracket of a norm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationGroup {
    LowEducation,
    HighEducation,
}

impl EducationGroup {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EducationGroup::LowEducation => "low_education",
            EducationGroup::HighEducation => "high_education",
        }
    }
}

impl fmt::Display for EducationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest completed schooling level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationLevel {
    None,
    Fundamental,
    Medio,
    Graduacao,
    Posgrad,
}

/// The patient facts the norms depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<EducationLevel>,
    /// Legacy years of schooling, used only when the level is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_years: Option<u32>,
}

impl Patient {
    #[must_use]
    pub fn new(age: u32) -> Self {
        Self {
            age,
            education_level: None,
            education_years: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: EducationLevel) -> Self {
        self.education_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_years(mut self, years: u32) -> Self {
        self.education_years = Some(years);
        self
    }

    #[must_use]
    pub fn age_group(&self) -> AgeGroup {
        AgeGroup::from_age(self.age)
    }

    /// Level first, then legacy years, then low education.
    #[must_use]
    pub fn education_group(&self) -> EducationGroup {
        match self.education_level {
            Some(EducationLevel::None | EducationLevel::Fundamental | EducationLevel::Medio) => {
                EducationGroup::LowEducation
            }
            Some(EducationLevel::Graduacao | EducationLevel::Posgrad) => {
                EducationGroup::HighEducation
            }
            None => match self.education_years {
                Some(years) if years >= HIGH_EDUCATION_MIN_YEARS => EducationGroup::HighEducation,
                _ => EducationGroup::LowEducation,
            },
        }
    }
}

// =============================================================================
// NORMATIVE DATA
// =============================================================================

/// Mean and standard deviation of one reference group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Norm {
    pub mean: f64,
    pub sd: f64,
}

impl Norm {
    #[must_use]
    pub fn z_score(&self, raw: f64) -> f64 {
        calculate_z_score(raw, self.mean, self.sd)
    }
}

type GroupNorms = BTreeMap<AgeGroup, BTreeMap<EducationGroup, Norm>>;

/// Per-test norms by age group and education group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormativeData {
    tests: BTreeMap<CognitiveTest, GroupNorms>,
}

/// (test, age group, low mean, low sd, high mean, high sd)
const EXAMPLE_NORMS: [(CognitiveTest, AgeGroup, f64, f64, f64, f64); 12] = [
    (CognitiveTest::TmtA, AgeGroup::Sixties, 38.5, 15.2, 29.8, 10.1),
    (CognitiveTest::TmtA, AgeGroup::Seventies, 55.1, 21.3, 40.2, 14.7),
    (CognitiveTest::TmtA, AgeGroup::EightyPlus, 70.8, 28.9, 58.4, 22.1),
    (CognitiveTest::TmtB, AgeGroup::Sixties, 95.2, 35.4, 70.1, 25.8),
    (CognitiveTest::TmtB, AgeGroup::Seventies, 135.7, 48.2, 98.3, 32.1),
    (CognitiveTest::TmtB, AgeGroup::EightyPlus, 180.5, 65.7, 140.2, 45.3),
    (CognitiveTest::DigitSpan, AgeGroup::Sixties, 10.8, 2.1, 12.4, 2.3),
    (CognitiveTest::DigitSpan, AgeGroup::Seventies, 9.5, 2.4, 11.2, 2.6),
    (CognitiveTest::DigitSpan, AgeGroup::EightyPlus, 8.1, 2.8, 9.8, 2.9),
    (CognitiveTest::Stroop, AgeGroup::Sixties, 45.2, 12.3, 35.8, 9.1),
    (CognitiveTest::Stroop, AgeGroup::Seventies, 58.7, 16.8, 44.2, 12.4),
    (CognitiveTest::Stroop, AgeGroup::EightyPlus, 75.3, 22.1, 58.9, 16.7),
];

impl NormativeData {
    /// The built-in example table (TMT-A, TMT-B, Digit Span, Stroop; ages 60+).
    #[must_use]
    pub fn example() -> Self {
        let mut data = Self::default();
        for (test, age, low_mean, low_sd, high_mean, high_sd) in EXAMPLE_NORMS {
            data.insert(
                test,
                age,
                EducationGroup::LowEducation,
                Norm {
                    mean: low_mean,
                    sd: low_sd,
                },
            );
            data.insert(
                test,
                age,
                EducationGroup::HighEducation,
                Norm {
                    mean: high_mean,
                    sd: high_sd,
                },
            );
        }
        data
    }

    /// Parse a `normative_data.json` document.
    pub fn from_json_str(json: &str) -> Result<Self, ZScoreError> {
        serde_json::from_str(json).map_err(|e| ZScoreError::SerializationError(e.to_string()))
    }

    pub fn insert(
        &mut self,
        test: CognitiveTest,
        age: AgeGroup,
        education: EducationGroup,
        norm: Norm,
    ) {
        self.tests
            .entry(test)
            .or_default()
            .entry(age)
            .or_default()
            .insert(education, norm);
    }

    #[must_use]
    pub fn has_test(&self, test: CognitiveTest) -> bool {
        self.tests.contains_key(&test)
    }

    #[must_use]
    pub fn get(
        &self,
        test: CognitiveTest,
        age: AgeGroup,
        education: EducationGroup,
    ) -> Option<Norm> {
        self.tests.get(&test)?.get(&age)?.get(&education).copied()
    }

    fn require(
        &self,
        test: CognitiveTest,
        age: AgeGroup,
        education: EducationGroup,
    ) -> Result<Norm, ZScoreError> {
        self.get(test, age, education)
            .ok_or_else(|| ZScoreError::MissingNorm(format!("{}, {}, {}", test, age, education)))
    }
}

// =============================================================================
// Z-SCORES
// =============================================================================

/// `(raw - mean) / sd`, or 0 when `sd` is 0.
#[must_use]
pub fn calculate_z_score(raw: f64, mean: f64, sd: f64) -> f64 {
    if sd == 0.0 {
        return 0.0;
    }
    (raw - mean) / sd
}

/// Clock Drawing Test (0-10 points) Z-score, rounded to two decimals.
///
/// Fixed table by age (< 65, < 75, 75+) and schooling (<= 8 years or more),
/// after Cacho-Gutiérrez et al. (1999). Missing years count as 8.
#[must_use]
pub fn clock_drawing_z_score(patient: &Patient, total: f64) -> f64 {
    let years = patient
        .education_years
        .unwrap_or(CLOCK_DEFAULT_EDUCATION_YEARS);
    let low = years <= CLOCK_DEFAULT_EDUCATION_YEARS;

    let (mean, sd) = match (patient.age, low) {
        (0..=64, true) => (8.5, 1.2),
        (0..=64, false) => (9.2, 0.9),
        (65..=74, true) => (7.8, 1.5),
        (65..=74, false) => (8.7, 1.1),
        (_, true) => (7.2, 1.8),
        (_, false) => (8.0, 1.4),
    };

    ((total - mean) / sd * 100.0).round() / 100.0
}

// =============================================================================
// RISK SCORE
// =============================================================================

/// Final risk of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskScore {
    Critical,
    High,
    Moderate,
    Low,
}

impl RiskScore {
    /// Risk for a mean Z-score. Bounds are inclusive; NaN is `Low`.
    #[must_use]
    pub fn from_mean_z(mean: f64) -> Self {
        if mean <= -2.0 {
            RiskScore::Critical
        } else if mean <= -1.5 {
            RiskScore::High
        } else if mean <= -1.0 {
            RiskScore::Moderate
        } else {
            RiskScore::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RiskScore::Critical => "CRITICAL",
            RiskScore::High => "HIGH",
            RiskScore::Moderate => "MODERATE",
            RiskScore::Low => "LOW",
        }
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ASSESSMENT SCORING
// =============================================================================

/// Raw results of one assessment. Tests not taken are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResults {
    /// Forward plus backward span.
    #[serde(default)]
    pub digit_span_total: Option<f64>,
    /// MEEM total, 0-30.
    #[serde(default)]
    pub meem_total: Option<f64>,
    /// Clock Drawing Test total, 0-10.
    #[serde(default)]
    pub clock_drawing_total: Option<f64>,
    #[serde(default)]
    pub tmt_a_seconds: Option<f64>,
    #[serde(default)]
    pub tmt_b_seconds: Option<f64>,
    /// Interference card time.
    #[serde(default)]
    pub stroop_interference_seconds: Option<f64>,
}

impl RawResults {
    /// Raw value for one test.
    #[must_use]
    pub fn get(&self, test: CognitiveTest) -> Option<f64> {
        match test {
            CognitiveTest::DigitSpan => self.digit_span_total,
            CognitiveTest::Meem => self.meem_total,
            CognitiveTest::ClockDrawing => self.clock_drawing_total,
            CognitiveTest::TmtA => self.tmt_a_seconds,
            CognitiveTest::TmtB => self.tmt_b_seconds,
            CognitiveTest::Stroop => self.stroop_interference_seconds,
        }
    }

    /// Reject non-finite raw values.
    pub fn validate(&self) -> Result<(), ZScoreError> {
        for test in CognitiveTest::ALL {
            if let Some(raw) = self.get(test) {
                ensure_finite(raw)?;
            }
        }
        Ok(())
    }
}

/// Patient plus results: everything needed to score one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub patient: Patient,
    #[serde(default)]
    pub results: RawResults,
}

/// Z-scores and risk of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAssessment {
    /// Raw-orientation Z-scores; feed to [`crate::normalize_assessment`]
    /// for deficit-oriented values.
    pub z_scores: AssessmentScores,
    /// `None` when no test was completed.
    pub mean_z_score: Option<f64>,
    pub risk: Option<RiskScore>,
}

/// Scores assessments against a normative table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCalculator {
    norms: NormativeData,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(NormativeData::example())
    }
}

impl ScoreCalculator {
    #[must_use]
    pub fn new(norms: NormativeData) -> Self {
        Self { norms }
    }

    #[must_use]
    pub fn norms(&self) -> &NormativeData {
        &self.norms
    }

    /// Z-score of one raw result for `patient`.
    pub fn z_score(
        &self,
        test: CognitiveTest,
        patient: &Patient,
        raw: f64,
    ) -> Result<f64, ZScoreError> {
        let age = patient.age_group();
        let education = patient.education_group();

        match test {
            CognitiveTest::ClockDrawing => Ok(clock_drawing_z_score(patient, raw)),
            CognitiveTest::Meem if !self.norms.has_test(CognitiveTest::Meem) => {
                let norm = match education {
                    EducationGroup::HighEducation => MEEM_FALLBACK_HIGH_EDUCATION,
                    EducationGroup::LowEducation => MEEM_FALLBACK_LOW_EDUCATION,
                };
                Ok(norm.z_score(raw))
            }
            _ => Ok(self.norms.require(test, age, education)?.z_score(raw)),
        }
    }

    /// Score every completed test and derive the final risk.
    pub fn score(
        &self,
        patient: &Patient,
        results: &RawResults,
    ) -> Result<ScoredAssessment, ZScoreError> {
        results.validate()?;

        let mut z_scores = AssessmentScores::default();
        let mut completed = Vec::new();
        for test in CognitiveTest::ALL {
            if let Some(raw) = results.get(test) {
                let z = self.z_score(test, patient, raw)?;
                z_scores.set(test, Some(z));
                completed.push(z);
            }
        }

        let mean_z_score = if completed.is_empty() {
            None
        } else {
            Some(completed.iter().sum::<f64>() / completed.len() as f64)
        };
        let risk = mean_z_score.map(RiskScore::from_mean_z);

        tracing::debug!(
            completed = completed.len(),
            risk = risk.map(RiskScore::as_str),
            "Scored assessment"
        );

        Ok(ScoredAssessment {
            z_scores,
            mean_z_score,
            risk,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn z_score_formula() {
        assert!(close(calculate_z_score(76.4, 55.1, 21.3), 1.0));
        assert!(close(calculate_z_score(9.5, 9.5, 2.4), 0.0));
    }

    #[test]
    fn zero_sd_yields_zero() {
        assert!(close(calculate_z_score(42.0, 10.0, 0.0), 0.0));
    }

    #[test]
    fn age_groups() {
        assert_eq!(AgeGroup::from_age(55), AgeGroup::Fifties);
        assert_eq!(AgeGroup::from_age(60), AgeGroup::Sixties);
        assert_eq!(AgeGroup::from_age(79), AgeGroup::Seventies);
        assert_eq!(AgeGroup::from_age(80), AgeGroup::EightyPlus);
        assert_eq!(AgeGroup::from_age(45), AgeGroup::EightyPlus);
    }

    #[test]
    fn education_level_takes_precedence_over_years() {
        let patient = Patient::new(70)
            .with_level(EducationLevel::Graduacao)
            .with_years(2);
        assert_eq!(patient.education_group(), EducationGroup::HighEducation);

        let patient = Patient::new(70)
            .with_level(EducationLevel::Medio)
            .with_years(16);
        assert_eq!(patient.education_group(), EducationGroup::LowEducation);
    }

    #[test]
    fn education_years_fallback() {
        assert_eq!(
            Patient::new(70).with_years(8).education_group(),
            EducationGroup::HighEducation
        );
        assert_eq!(
            Patient::new(70).with_years(7).education_group(),
            EducationGroup::LowEducation
        );
        assert_eq!(
            Patient::new(70).education_group(),
            EducationGroup::LowEducation
        );
    }

    #[test]
    fn table_lookup() {
        let calculator = ScoreCalculator::default();
        let patient = Patient::new(72).with_level(EducationLevel::Medio);

        let z = calculator
            .z_score(CognitiveTest::TmtA, &patient, 76.4)
            .expect("norm");
        assert!(close(z, 1.0));

        let graduate = Patient::new(65).with_level(EducationLevel::Posgrad);
        let z = calculator
            .z_score(CognitiveTest::DigitSpan, &graduate, 12.4)
            .expect("norm");
        assert!(close(z, 0.0));
    }

    #[test]
    fn missing_age_group_is_an_error() {
        let calculator = ScoreCalculator::default();
        let result = calculator.z_score(CognitiveTest::Stroop, &Patient::new(55), 50.0);
        assert!(matches!(
            result,
            Err(ZScoreError::MissingNorm(ref detail)) if detail == "stroop, 50-59, low_education"
        ));
    }

    #[test]
    fn meem_uses_fallback_norms() {
        let calculator = ScoreCalculator::default();
        let high = Patient::new(68).with_level(EducationLevel::Graduacao);
        let low = Patient::new(68).with_level(EducationLevel::Fundamental);

        let z = calculator
            .z_score(CognitiveTest::Meem, &high, 28.5)
            .expect("fallback");
        assert!(close(z, 0.0));

        let z = calculator
            .z_score(CognitiveTest::Meem, &low, 20.6)
            .expect("fallback");
        assert!((z + 2.0).abs() < 1e-9);
    }

    #[test]
    fn meem_table_overrides_fallback() {
        let mut norms = NormativeData::example();
        norms.insert(
            CognitiveTest::Meem,
            AgeGroup::Sixties,
            EducationGroup::LowEducation,
            Norm { mean: 24.0, sd: 2.0 },
        );
        let calculator = ScoreCalculator::new(norms);

        let z = calculator
            .z_score(CognitiveTest::Meem, &Patient::new(61), 22.0)
            .expect("table");
        assert!(close(z, -1.0));

        // With a meem entry present, other groups no longer fall back.
        assert!(
            calculator
                .z_score(CognitiveTest::Meem, &Patient::new(75), 22.0)
                .is_err()
        );
    }

    #[test]
    fn clock_drawing_table_and_rounding() {
        let patient = Patient::new(70).with_years(10);
        assert!(close(clock_drawing_z_score(&patient, 6.5), -2.0));

        // No years recorded counts as 8: low-education row.
        let patient = Patient::new(80);
        assert!(close(clock_drawing_z_score(&patient, 5.0), -1.22));

        let patient = Patient::new(60).with_years(8);
        assert!(close(clock_drawing_z_score(&patient, 8.5), 0.0));
    }

    #[test]
    fn risk_boundaries_are_inclusive() {
        assert_eq!(RiskScore::from_mean_z(-2.0), RiskScore::Critical);
        assert_eq!(RiskScore::from_mean_z(-1.5), RiskScore::High);
        assert_eq!(RiskScore::from_mean_z(-1.0), RiskScore::Moderate);
        assert_eq!(RiskScore::from_mean_z(-0.99), RiskScore::Low);
        assert_eq!(RiskScore::from_mean_z(1.5), RiskScore::Low);
        assert_eq!(RiskScore::from_mean_z(f64::NAN), RiskScore::Low);
    }

    #[test]
    fn score_assessment() {
        let calculator = ScoreCalculator::default();
        let patient = Patient::new(72).with_level(EducationLevel::Medio);
        let results = RawResults {
            digit_span_total: Some(4.0),
            meem_total: Some(20.0),
            ..RawResults::default()
        };

        let scored = calculator.score(&patient, &results).expect("score");

        assert!(scored.z_scores.digit_span.is_some());
        assert!(scored.z_scores.meem.is_some());
        assert!(scored.z_scores.tmt_a.is_none());
        assert_eq!(scored.risk, Some(RiskScore::Critical));
    }

    #[test]
    fn empty_assessment_has_no_risk() {
        let scored = ScoreCalculator::default()
            .score(&Patient::new(70), &RawResults::default())
            .expect("score");
        assert_eq!(scored.mean_z_score, None);
        assert_eq!(scored.risk, None);
    }

    #[test]
    fn non_finite_raw_values_are_rejected() {
        let results = RawResults {
            tmt_a_seconds: Some(f64::NAN),
            ..RawResults::default()
        };
        assert!(matches!(
            ScoreCalculator::default().score(&Patient::new(70), &results),
            Err(ZScoreError::InvalidScore(_))
        ));
    }

    #[test]
    fn norms_load_from_json() {
        let json = r#"{
            "tmt_a": { "60-69": { "low_education": { "mean": 40.0, "sd": 10.0 } } },
            "meem":  { "80+":   { "high_education": { "mean": 27.0, "sd": 2.0 } } }
        }"#;
        let norms = NormativeData::from_json_str(json).expect("parse");

        assert_eq!(
            norms.get(
                CognitiveTest::TmtA,
                AgeGroup::Sixties,
                EducationGroup::LowEducation
            ),
            Some(Norm { mean: 40.0, sd: 10.0 })
        );
        assert!(norms.has_test(CognitiveTest::Meem));
        assert!(!norms.has_test(CognitiveTest::Stroop));
    }

    #[test]
    fn unknown_test_in_json_is_rejected() {
        let json = r#"{ "rey_figure": {} }"#;
        assert!(matches!(
            NormativeData::from_json_str(json),
            Err(ZScoreError::SerializationError(_))
        ));
    }

    #[test]
    fn example_table_covers_every_group() {
        let norms = NormativeData::example();
        for test in [
            CognitiveTest::TmtA,
            CognitiveTest::TmtB,
            CognitiveTest::DigitSpan,
            CognitiveTest::Stroop,
        ] {
            for age in [AgeGroup::Sixties, AgeGroup::Seventies, AgeGroup::EightyPlus] {
                for education in [EducationGroup::LowEducation, EducationGroup::HighEducation] {
                    assert!(norms.get(test, age, education).is_some());
                }
            }
        }
        assert!(!norms.has_test(CognitiveTest::Meem));
    }
}
