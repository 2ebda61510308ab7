//! # zscore-core
//!
//! The Z-score presentation engine - THE LOGIC.
//!
//! Turns neuropsychological Z-scores into what a report page shows: a risk
//! band with colour and label, a normal-distribution percentile, chart
//! option objects and inline styling for score elements. Also scores raw
//! test results against age- and education-stratified norms.
//!
//! ## Architectural Constraints
//!
//! - Pure functions over `f64`; no async, no network, no file I/O
//! - Pages and chart renderers are collaborators behind traits
//!   ([`PageDocument`], [`PageElement`], [`ChartRenderer`])
//! - Nothing registers globally; hosts build a [`ZScoreToolkit`] and call
//!   [`ZScoreToolkit::init`] when their page is ready

// =============================================================================
// MODULES
// =============================================================================

pub mod chart;
pub mod classify;
pub mod decorate;
pub mod format;
pub mod interpret;
pub mod normalize;
pub mod page;
pub mod percentile;
pub mod primitives;
pub mod score;
pub mod toolkit;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    Classification, CognitiveTest, RiskBand, TestKind, ZScoreError, ensure_finite,
};

// =============================================================================
// RE-EXPORTS: Scoring
// =============================================================================

pub use classify::{classify, color, describe, label};
pub use interpret::{ClinicalCategory, interpret};
pub use normalize::{
    AssessmentScores, composite_z_score, normalize_assessment, normalize_for_deficit,
    normalize_named,
};
pub use percentile::{cdf, percentile, whole_percentile};
pub use score::{
    AgeGroup, EducationGroup, EducationLevel, Norm, NormativeData, Patient, RawResults,
    RiskScore, ScoreCalculator, ScoreRequest, ScoredAssessment, calculate_z_score,
    clock_drawing_z_score,
};

// =============================================================================
// RE-EXPORTS: Presentation
// =============================================================================

pub use chart::{ChartOptions, ChartPreset, ChartRenderer, Dataset, JsonChartRenderer};
pub use decorate::{DecorationReport, PageDocument, PageElement, apply_colors, parse_float};
pub use format::to_fixed;
pub use page::{Page, PageNode};
pub use toolkit::ZScoreToolkit;
