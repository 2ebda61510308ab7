//! # zscore - Z-Score Classification Server
//!
//! The main binary for the zscore presentation engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for classification, charts and page decoration
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/zscore (THE BINARY)           │
//! │                                               │
//! │   ┌─────────────┐        ┌─────────────┐      │
//! │   │   CLI       │        │   HTTP API  │      │
//! │   │  (clap)     │        │   (axum)    │      │
//! │   └──────┬──────┘        └──────┬──────┘      │
//! │          └──────────┬───────────┘             │
//! │                     ▼                         │
//! │             ┌───────────────┐                 │
//! │             │  zscore-core  │                 │
//! │             │  (THE LOGIC)  │                 │
//! │             └───────────────┘                 │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! zscore serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! zscore classify -- -2.6 -1.2 0.3
//! zscore chart --preset time
//! zscore decorate -i page.json -o page.decorated.json
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zscore::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. ZSCORE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ZSCORE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "zscore=debug,zscore_core=debug,tower_http=debug"
    } else {
        "zscore=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the zscore startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗███████╗ ██████╗ ██████╗ ██████╗ ███████╗
  ╚══███╔╝██╔════╝██╔════╝██╔═══██╗██╔══██╗██╔════╝
    ███╔╝ ███████╗██║     ██║   ██║██████╔╝█████╗
   ███╔╝  ╚════██║██║     ██║   ██║██╔══██╗██╔══╝
  ███████╗███████║╚██████╗╚██████╔╝██║  ██║███████╗
  ╚══════╝╚══════╝ ╚═════╝ ╚═════╝ ╚═╝  ╚═╝╚══════╝

  Z-Score Classification v{}

  Bands • Percentiles • Charts
"#,
        env!("CARGO_PKG_VERSION")
    );
}
