//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Handlers are thin: validate input at the boundary, call the pure core,
//! wrap the result. Errors become `(status, ErrorResponse)` pairs.

use super::{
    AppState,
    types::{
        BatchClassifyRequest, BatchClassifyResponse, ClassifyQuery, CompositeResponse,
        DecorateResponse, ErrorResponse, HealthResponse, InterpretRequest, InterpretResponse,
        NormalizeRequest, NormalizeResponse, ScoreResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use zscore_core::{
    AssessmentScores, ChartOptions, ChartPreset, ChartRenderer, Classification, CognitiveTest,
    Dataset, JsonChartRenderer, Page, ScoreRequest, ZScoreError, composite_z_score, describe,
    ensure_finite, interpret, normalize_assessment, normalize_for_deficit,
};

/// Error half of every fallible handler.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &ZScoreError) -> ApiError {
    (status, Json(ErrorResponse::new(error.to_string())))
}

fn bad_request(error: ZScoreError) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, &error)
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CLASSIFY HANDLERS
// =============================================================================

/// Classify a single score from the query string.
pub async fn classify_handler(
    Query(query): Query<ClassifyQuery>,
) -> Result<Json<Classification>, ApiError> {
    let score = ensure_finite(query.score).map_err(bad_request)?;
    Ok(Json(describe(score)))
}

/// Classify a batch of scores.
pub async fn classify_batch_handler(
    Json(request): Json<BatchClassifyRequest>,
) -> Result<Json<BatchClassifyResponse>, ApiError> {
    request.validate().map_err(bad_request)?;

    let classifications = request.scores.iter().map(|&s| describe(s)).collect();
    Ok(Json(BatchClassifyResponse {
        success: true,
        classifications,
    }))
}

// =============================================================================
// CHART HANDLERS
// =============================================================================

fn lookup_preset(name: &str) -> Result<ChartPreset, ApiError> {
    ChartPreset::from_name(name).map_err(|e| api_error(StatusCode::NOT_FOUND, &e))
}

/// Option object of a chart preset.
pub async fn chart_handler(
    State(state): State<AppState>,
    Path(preset): Path<String>,
) -> Result<Json<ChartOptions>, ApiError> {
    let preset = lookup_preset(&preset)?;
    Ok(Json(state.toolkit.preset(preset).clone()))
}

/// Full chart configuration for a preset and the posted datasets.
pub async fn chart_render_handler(
    State(state): State<AppState>,
    Path(preset): Path<String>,
    Json(datasets): Json<Vec<Dataset>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let preset = lookup_preset(&preset)?;
    for dataset in &datasets {
        for &value in &dataset.data {
            ensure_finite(value).map_err(bad_request)?;
        }
    }

    let mut renderer = JsonChartRenderer;
    renderer
        .render(state.toolkit.preset(preset), &datasets)
        .map(Json)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e))
}

// =============================================================================
// DECORATE HANDLER
// =============================================================================

/// Decorate a posted page snapshot and return it.
pub async fn decorate_handler(
    State(state): State<AppState>,
    Json(mut page): Json<Page>,
) -> impl IntoResponse {
    let report = state.toolkit.apply_colors(&mut page);
    tracing::debug!(
        decorated = report.decorated,
        skipped = report.skipped,
        "Decorated page snapshot"
    );
    Json(DecorateResponse {
        success: true,
        page,
        report,
    })
}

// =============================================================================
// NORMALIZE / COMPOSITE / INTERPRET HANDLERS
// =============================================================================

/// Normalise one raw score for deficit direction.
pub async fn normalize_handler(
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, ApiError> {
    let raw = ensure_finite(request.z_score).map_err(bad_request)?;
    let test = CognitiveTest::from_name(&request.test).map_err(bad_request)?;

    Ok(Json(NormalizeResponse {
        success: true,
        test,
        kind: test.kind(),
        raw,
        normalized: normalize_for_deficit(raw, test.kind()),
    }))
}

/// Normalise an assessment and compute its composite score.
pub async fn composite_handler(
    Json(scores): Json<AssessmentScores>,
) -> Result<Json<CompositeResponse>, ApiError> {
    for test in CognitiveTest::ALL {
        if let Some(z) = scores.get(test) {
            ensure_finite(z).map_err(bad_request)?;
        }
    }

    let normalized = normalize_assessment(&scores);
    let composite = composite_z_score(&normalized);

    Ok(Json(CompositeResponse {
        success: true,
        classification: describe(composite),
        category: interpret(composite),
        normalized,
        composite,
    }))
}

/// Clinical category of a normalised score.
pub async fn interpret_handler(
    Json(request): Json<InterpretRequest>,
) -> Result<Json<InterpretResponse>, ApiError> {
    let score = ensure_finite(request.z_score).map_err(bad_request)?;
    Ok(Json(InterpretResponse::for_score(score)))
}

// =============================================================================
// SCORE HANDLER
// =============================================================================

/// Z-scores and final risk of an assessment's raw results.
///
/// A patient outside the normative table is 422.
pub async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let scored = state
        .calculator
        .score(&request.patient, &request.results)
        .map_err(|e| match e {
            ZScoreError::MissingNorm(_) => api_error(StatusCode::UNPROCESSABLE_ENTITY, &e),
            _ => bad_request(e),
        })?;
    Ok(Json(ScoreResponse::from(scored)))
}
