//! # zscore HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /classify?score=<z>` - Band, colour, label and percentile of one score
//! - `POST /classify` - Same, for a batch of scores
//! - `GET /charts/{preset}` - Chart option object (`zscore`, `time`, `performance`)
//! - `POST /charts/{preset}/render` - Full chart configuration for posted datasets
//! - `POST /decorate` - Colour the score elements of a page snapshot
//! - `POST /normalize` - Deficit-normalise one raw score
//! - `POST /composite` - Normalise an assessment and average it
//! - `POST /interpret` - Clinical category of a normalised score
//! - `POST /score` - Z-scores and final risk of an assessment's raw results
//!
//! ## Security Configuration
//!
//! Read from [`ServerConfig`]; see [`crate::config`] for the file and
//! environment variables.

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{ApiKey, keys_match};
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
// Re-export handlers and types for integration tests (via `zscore::api::*`)
pub use handlers::{
    ApiError, chart_handler, chart_render_handler, classify_batch_handler, classify_handler,
    composite_handler, decorate_handler, health_handler, interpret_handler, normalize_handler,
    score_handler,
};
pub use types::{
    BatchClassifyRequest, BatchClassifyResponse, ClassifyQuery, CompositeResponse,
    DecorateResponse, ErrorResponse, HealthResponse, InterpretRequest, InterpretResponse,
    MAX_BATCH_SCORES, NormalizeRequest, NormalizeResponse, ScoreResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use zscore_core::{ScoreCalculator, ZScoreError, ZScoreToolkit};

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state. Everything in it is immutable, so no locks.
#[derive(Clone)]
pub struct AppState {
    pub toolkit: Arc<ZScoreToolkit>,
    pub calculator: Arc<ScoreCalculator>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new app state with the built-in normative table.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self::with_calculator(config, ScoreCalculator::default())
    }

    #[must_use]
    pub fn with_calculator(config: ServerConfig, calculator: ScoreCalculator) -> Self {
        Self {
            toolkit: Arc::new(ZScoreToolkit::new()),
            calculator: Arc::new(calculator),
            config: Arc::new(config),
        }
    }

    /// Create app state, reading the configured normative table.
    pub fn load(config: ServerConfig) -> Result<Self, ZScoreError> {
        let calculator = ScoreCalculator::new(config.norms()?);
        Ok(Self::with_calculator(config, calculator))
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from configuration.
///
/// - `"*"`: allows all origins (development only)
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (cors_origins = \"*\"). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - protects against floods (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    let cors = build_cors_layer(config.cors_origins.as_deref());

    let rate_limiter = if config.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
        Some(create_rate_limiter(config.rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let api_key: Option<ApiKey> = config.api_key.as_deref().map(Arc::from);
    if api_key.is_some() {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set ZSCORE_API_KEY or api_key in zscore.toml to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/classify",
            get(handlers::classify_handler).post(handlers::classify_batch_handler),
        )
        .route("/charts/{preset}", get(handlers::chart_handler))
        .route(
            "/charts/{preset}/render",
            post(handlers::chart_render_handler),
        )
        .route("/decorate", post(handlers::decorate_handler))
        .route("/normalize", post(handlers::normalize_handler))
        .route("/composite", post(handlers::composite_handler))
        .route("/interpret", post(handlers::interpret_handler))
        .route("/score", post(handlers::score_handler));

    if let Some(key) = api_key {
        router = router.layer(axum_middleware::from_fn_with_state(
            key,
            auth::api_key_auth_middleware,
        ));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and serve until Ctrl+C.
pub async fn run_server(config: ServerConfig) -> Result<(), ZScoreError> {
    let addr = config.bind_addr();
    let router = create_router(AppState::load(config)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ZScoreError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("zscore HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ZScoreError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
