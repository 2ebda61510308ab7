//! # zscore CLI Module
//!
//! This module implements the CLI interface for zscore.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `classify` - Band, colour, label and percentile of scores
//! - `percentile` - Normal-distribution percentile of scores
//! - `chart` - Print a chart preset, or render it with datasets
//! - `decorate` - Colour the score elements of a page snapshot
//! - `normalize` - Deficit-normalise one raw test score
//! - `composite` - Normalise an assessment file and average it
//! - `interpret` - Clinical category of a normalised score
//! - `score` - Z-scores and final risk of an assessment's raw results

mod commands;

use crate::config::{ServerConfig, load_norms};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zscore_core::{ScoreCalculator, ZScoreError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// zscore - Z-score classification for neuropsychological reports
///
/// Classifies scores into risk bands, estimates percentiles and builds
/// chart and page presentation for them.
#[derive(Parser, Debug)]
#[command(name = "zscore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the server configuration file
    #[arg(short = 'c', long, global = true, default_value = "zscore.toml")]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Classify one or more Z-scores
    Classify {
        /// Scores to classify
        #[arg(required = true, allow_negative_numbers = true)]
        scores: Vec<f64>,
    },

    /// Percentile of one or more Z-scores
    Percentile {
        /// Scores to convert
        #[arg(required = true, allow_negative_numbers = true)]
        scores: Vec<f64>,
    },

    /// Print a chart preset's options, or a full configuration with datasets
    Chart {
        /// Preset name (zscore, time, performance)
        #[arg(short = 't', long, default_value = "zscore")]
        preset: String,

        /// JSON file with an array of `{ "label", "data" }` datasets
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Colour score elements of a JSON page snapshot
    Decorate {
        /// Input page snapshot
        #[arg(short, long)]
        input: PathBuf,

        /// Write the decorated page here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Deficit-normalise one raw test score
    Normalize {
        /// Test name (digit_span, meem, clock_drawing, tmt_a, tmt_b, stroop)
        #[arg(short = 't', long)]
        test: String,

        /// Raw Z-score
        #[arg(short, long, allow_negative_numbers = true)]
        score: f64,
    },

    /// Normalise an assessment file and compute its composite score
    Composite {
        /// JSON file with raw Z-scores keyed by test name
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Clinical category of a normalised Z-score
    Interpret {
        /// Normalised Z-score
        #[arg(allow_negative_numbers = true)]
        score: f64,
    },

    /// Score raw test results against the normative table
    Score {
        /// JSON file with `{ "patient": {...}, "results": {...} }`
        #[arg(short, long)]
        file: PathBuf,

        /// Normative table JSON (overrides `norms_file` in the config)
        #[arg(short, long)]
        norms: Option<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), ZScoreError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = ServerConfig::load(&cli.config)?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            cmd_serve(config).await
        }
        Commands::Classify { scores } => cmd_classify(&scores, json_mode),
        Commands::Percentile { scores } => cmd_percentile(&scores, json_mode),
        Commands::Chart {
            preset,
            data,
            output,
        } => cmd_chart(&preset, data.as_deref(), output.as_deref()),
        Commands::Decorate { input, output } => {
            cmd_decorate(&input, output.as_deref(), json_mode)
        }
        Commands::Normalize { test, score } => cmd_normalize(&test, score, json_mode),
        Commands::Composite { file } => cmd_composite(&file, json_mode),
        Commands::Interpret { score } => cmd_interpret(score, json_mode),
        Commands::Score { file, norms } => {
            let norms = match norms {
                Some(path) => load_norms(&path)?,
                None => ServerConfig::load(&cli.config)?.norms()?,
            };
            cmd_score(&file, &ScoreCalculator::new(norms), json_mode)
        }
    }
}
