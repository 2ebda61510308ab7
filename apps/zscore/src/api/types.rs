//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zscore_core::{
    AssessmentScores, Classification, ClinicalCategory, CognitiveTest, DecorationReport, Page,
    RiskScore, ScoredAssessment, TestKind, ZScoreError, ensure_finite,
};

/// Maximum number of scores in one batch classification.
pub const MAX_BATCH_SCORES: usize = 10_000;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body returned with every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// =============================================================================
// CLASSIFY
// =============================================================================

/// Query string of `GET /classify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyQuery {
    pub score: f64,
}

/// Body of `POST /classify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchClassifyRequest {
    pub scores: Vec<f64>,
}

impl BatchClassifyRequest {
    /// Reject oversized batches and non-finite scores.
    pub fn validate(&self) -> Result<(), ZScoreError> {
        if self.scores.len() > MAX_BATCH_SCORES {
            return Err(ZScoreError::InvalidScore(format!(
                "Batch of {} scores exceeds maximum {}",
                self.scores.len(),
                MAX_BATCH_SCORES
            )));
        }
        for &score in &self.scores {
            ensure_finite(score)?;
        }
        Ok(())
    }
}

/// Response of `POST /classify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchClassifyResponse {
    pub success: bool,
    pub classifications: Vec<Classification>,
}

// =============================================================================
// DECORATE
// =============================================================================

/// Response of `POST /decorate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecorateResponse {
    pub success: bool,
    pub page: Page,
    pub report: DecorationReport,
}

// =============================================================================
// NORMALIZE
// =============================================================================

/// Body of `POST /normalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeRequest {
    pub test: String,
    pub z_score: f64,
}

/// Response of `POST /normalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub success: bool,
    pub test: CognitiveTest,
    pub kind: TestKind,
    pub raw: f64,
    pub normalized: f64,
}

// =============================================================================
// COMPOSITE
// =============================================================================

/// Response of `POST /composite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeResponse {
    pub success: bool,
    pub normalized: BTreeMap<CognitiveTest, f64>,
    pub composite: f64,
    pub classification: Classification,
    pub category: ClinicalCategory,
}

// =============================================================================
// INTERPRET
// =============================================================================

/// Body of `POST /interpret`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretRequest {
    pub z_score: f64,
}

/// Response of `POST /interpret`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretResponse {
    pub success: bool,
    pub category: ClinicalCategory,
    pub description: String,
    pub color: String,
    pub percentile: u8,
}

impl InterpretResponse {
    #[must_use]
    pub fn for_score(z_score: f64) -> Self {
        let category = zscore_core::interpret(z_score);
        Self {
            success: true,
            category,
            description: category.description().to_string(),
            color: category.color().to_string(),
            percentile: zscore_core::whole_percentile(z_score),
        }
    }
}

// =============================================================================
// SCORE
// =============================================================================

/// Response of `POST /score`. The body is a `zscore_core::ScoreRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub success: bool,
    pub z_scores: AssessmentScores,
    pub mean_z_score: Option<f64>,
    pub risk: Option<RiskScore>,
}

impl From<ScoredAssessment> for ScoreResponse {
    fn from(scored: ScoredAssessment) -> Self {
        Self {
            success: true,
            z_scores: scored.z_scores,
            mean_z_score: scored.mean_z_score,
            risk: scored.risk,
        }
    }
}
