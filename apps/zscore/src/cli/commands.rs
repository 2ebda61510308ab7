//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! File loading and rendering live in small public helpers so they can be
//! exercised without capturing stdout.

use crate::api;
use crate::config::ServerConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use zscore_core::{
    AssessmentScores, ChartPreset, ChartRenderer, CognitiveTest, Dataset, DecorationReport,
    JsonChartRenderer, Page, ScoreCalculator, ScoreRequest, ScoredAssessment, ZScoreError,
    ZScoreToolkit, composite_z_score, describe, ensure_finite, interpret, normalize_assessment,
    normalize_named, percentile, to_fixed,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a page snapshot (20 MB).
const MAX_PAGE_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Maximum size of an assessment or dataset file (1 MB).
const MAX_DATA_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), ZScoreError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ZScoreError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ZScoreError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input path.
///
/// Canonicalizes the path (resolving symlinks and `..`) and ensures it names
/// an existing regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, ZScoreError> {
    let canonical = path.canonicalize().map_err(|e| {
        ZScoreError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(ZScoreError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output path: its parent directory must exist.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, ZScoreError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        ZScoreError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(ZScoreError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| ZScoreError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Read and deserialize a size-checked JSON file.
fn read_json<T: DeserializeOwned>(path: &Path, max_size: u64) -> Result<T, ZScoreError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, max_size)?;

    let contents = std::fs::read_to_string(&validated)
        .map_err(|e| ZScoreError::IoError(format!("Read file: {}", e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| ZScoreError::SerializationError(format!("{}: {}", path.display(), e)))
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ZScoreError> {
    serde_json::to_string_pretty(value).map_err(|e| ZScoreError::SerializationError(e.to_string()))
}

/// Print to stdout, or write to `output` when given.
fn emit(text: &str, output: Option<&Path>) -> Result<(), ZScoreError> {
    match output {
        Some(path) => {
            let validated = validate_output_path(path)?;
            std::fs::write(&validated, text)
                .map_err(|e| ZScoreError::IoError(format!("Write file: {}", e)))?;
            println!("Wrote {} bytes to {:?}", text.len(), validated);
            Ok(())
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

// =============================================================================
// LOADERS
// =============================================================================

/// Load a page snapshot.
pub fn load_page(path: &Path) -> Result<Page, ZScoreError> {
    read_json(path, MAX_PAGE_FILE_SIZE)
}

/// Load an assessment, rejecting non-finite scores.
pub fn load_assessment(path: &Path) -> Result<AssessmentScores, ZScoreError> {
    let scores: AssessmentScores = read_json(path, MAX_DATA_FILE_SIZE)?;
    for test in CognitiveTest::ALL {
        if let Some(z) = scores.get(test) {
            ensure_finite(z)?;
        }
    }
    Ok(scores)
}

/// Load chart datasets, rejecting non-finite values.
pub fn load_datasets(path: &Path) -> Result<Vec<Dataset>, ZScoreError> {
    let datasets: Vec<Dataset> = read_json(path, MAX_DATA_FILE_SIZE)?;
    for dataset in &datasets {
        for &value in &dataset.data {
            ensure_finite(value)?;
        }
    }
    Ok(datasets)
}

/// Load a patient and raw results, rejecting non-finite values.
pub fn load_score_request(path: &Path) -> Result<ScoreRequest, ZScoreError> {
    let request: ScoreRequest = read_json(path, MAX_DATA_FILE_SIZE)?;
    request.results.validate()?;
    Ok(request)
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config: ServerConfig) -> Result<(), ZScoreError> {
    println!("zscore Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.host);
    println!("  Port:       {}", config.port);
    println!("  Rate limit: {} req/s", config.rate_limit);
    println!(
        "  Auth:       {}",
        if config.api_key.is_some() {
            "api key"
        } else {
            "disabled"
        }
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /health                 - Health check");
    println!("  GET  /classify?score=        - Classify one score");
    println!("  POST /classify               - Classify a batch");
    println!("  GET  /charts/{{preset}}        - Chart preset options");
    println!("  POST /charts/{{preset}}/render - Chart with datasets");
    println!("  POST /decorate               - Decorate a page snapshot");
    println!("  POST /normalize              - Normalise one test score");
    println!("  POST /composite              - Composite of an assessment");
    println!("  POST /interpret              - Clinical category");
    println!("  POST /score                  - Z-scores and risk of raw results");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config).await
}

// =============================================================================
// CLASSIFY / PERCENTILE COMMANDS
// =============================================================================

/// Classify scores.
pub fn cmd_classify(scores: &[f64], json_mode: bool) -> Result<(), ZScoreError> {
    let classifications = scores
        .iter()
        .map(|&s| ensure_finite(s).map(describe))
        .collect::<Result<Vec<_>, _>>()?;

    if json_mode {
        println!("{}", to_pretty_json(&classifications)?);
        return Ok(());
    }

    for c in &classifications {
        println!(
            "{:>7.2}  {:<9} {}  percentile {:.2}",
            c.score, c.label, c.color, c.percentile
        );
    }
    Ok(())
}

/// Print percentiles of scores.
pub fn cmd_percentile(scores: &[f64], json_mode: bool) -> Result<(), ZScoreError> {
    let rows = scores
        .iter()
        .map(|&s| ensure_finite(s).map(|s| (s, percentile(s))))
        .collect::<Result<Vec<_>, _>>()?;

    if json_mode {
        let output: Vec<serde_json::Value> = rows
            .iter()
            .map(|&(score, pct)| serde_json::json!({ "score": score, "percentile": pct }))
            .collect();
        println!("{}", to_pretty_json(&output)?);
        return Ok(());
    }

    for (score, pct) in rows {
        println!("{:>7.2}  {:.2}%", score, pct);
    }
    Ok(())
}

// =============================================================================
// CHART COMMAND
// =============================================================================

/// Options of `preset`, or the full configuration when datasets are given.
pub fn render_chart(
    preset: &str,
    datasets: Option<&[Dataset]>,
) -> Result<serde_json::Value, ZScoreError> {
    let preset = ChartPreset::from_name(preset)?;
    let toolkit = ZScoreToolkit::new();
    let options = toolkit.preset(preset);

    match datasets {
        Some(datasets) => JsonChartRenderer.render(options, datasets),
        None => serde_json::to_value(options)
            .map_err(|e| ZScoreError::SerializationError(e.to_string())),
    }
}

/// Print a chart preset or rendered chart.
pub fn cmd_chart(
    preset: &str,
    data: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), ZScoreError> {
    let datasets = data.map(load_datasets).transpose()?;
    let chart = render_chart(preset, datasets.as_deref())?;
    emit(&to_pretty_json(&chart)?, output)
}

// =============================================================================
// DECORATE COMMAND
// =============================================================================

/// Decorate a page snapshot file.
pub fn decorate_file(input: &Path) -> Result<(Page, DecorationReport), ZScoreError> {
    let mut page = load_page(input)?;
    let report = ZScoreToolkit::new().init(&mut page);
    Ok((page, report))
}

/// Decorate a page snapshot and write or print the result.
pub fn cmd_decorate(
    input: &Path,
    output: Option<&Path>,
    json_mode: bool,
) -> Result<(), ZScoreError> {
    let (page, report) = decorate_file(input)?;
    let rendered = to_pretty_json(&page)?;

    match output {
        Some(path) => {
            emit(&rendered, Some(path))?;
            if json_mode {
                println!("{}", to_pretty_json(&report)?);
            } else {
                println!(
                    "Decorated {} elements, skipped {}",
                    report.decorated, report.skipped
                );
            }
            Ok(())
        }
        None => emit(&rendered, None),
    }
}

// =============================================================================
// NORMALIZE / COMPOSITE / INTERPRET COMMANDS
// =============================================================================

/// Normalise one raw test score.
pub fn cmd_normalize(test: &str, score: f64, json_mode: bool) -> Result<(), ZScoreError> {
    let raw = ensure_finite(score)?;
    let normalized = normalize_named(raw, test)?;

    if json_mode {
        let output = serde_json::json!({
            "test": test,
            "raw": raw,
            "normalized": normalized,
        });
        println!("{}", to_pretty_json(&output)?);
        return Ok(());
    }

    println!("{}: {:.2} -> {:.2}", test, raw, normalized);
    Ok(())
}

/// Normalise an assessment file and print its composite score.
pub fn cmd_composite(file: &Path, json_mode: bool) -> Result<(), ZScoreError> {
    let scores = load_assessment(file)?;
    let normalized = normalize_assessment(&scores);
    let composite = composite_z_score(&normalized);
    let category = interpret(composite);

    if json_mode {
        let output = serde_json::json!({
            "normalized": normalized,
            "composite": composite,
            "classification": describe(composite),
            "category": category,
        });
        println!("{}", to_pretty_json(&output)?);
        return Ok(());
    }

    println!("Normalised Scores");
    println!("=================");
    for (test, z) in &normalized {
        println!("  {:<14} {:>7.2}", test.name(), z);
    }
    println!();
    println!("Composite: {:.2}", composite);
    println!("Category:  {}", category.description());
    Ok(())
}

/// Print the clinical category of a normalised score.
pub fn cmd_interpret(score: f64, json_mode: bool) -> Result<(), ZScoreError> {
    let response = api::InterpretResponse::for_score(ensure_finite(score)?);

    if json_mode {
        println!("{}", to_pretty_json(&response)?);
        return Ok(());
    }

    println!(
        "{} ({}), percentile {}",
        response.description, response.color, response.percentile
    );
    Ok(())
}

// =============================================================================
// SCORE COMMAND
// =============================================================================

/// Score the assessment in `file`.
pub fn score_file(
    file: &Path,
    calculator: &ScoreCalculator,
) -> Result<ScoredAssessment, ZScoreError> {
    let request = load_score_request(file)?;
    calculator.score(&request.patient, &request.results)
}

/// Print the Z-scores and final risk of an assessment file.
pub fn cmd_score(
    file: &Path,
    calculator: &ScoreCalculator,
    json_mode: bool,
) -> Result<(), ZScoreError> {
    let scored = score_file(file, calculator)?;

    if json_mode {
        println!("{}", to_pretty_json(&scored)?);
        return Ok(());
    }

    println!("Z-Scores");
    println!("========");
    for test in CognitiveTest::ALL {
        if let Some(z) = scored.z_scores.get(test) {
            println!("  {:<14} {:>7}", test.name(), to_fixed(z, 2));
        }
    }
    println!();
    match (scored.mean_z_score, scored.risk) {
        (Some(mean), Some(risk)) => {
            println!("Mean: {}", to_fixed(mean, 2));
            println!("Risk: {}", risk);
        }
        _ => println!("No completed tests"),
    }
    Ok(())
}
