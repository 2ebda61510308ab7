//! # Server Configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then environment
//! variables, then CLI flags (applied by the caller).
//!
//! ## File (`zscore.toml`)
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! rate_limit = 100
//! cors_origins = "https://reports.example.org"
//! api_key = "change-me"
//! norms_file = "normative_data.json"
//! ```
//!
//! ## Environment Variables
//!
//! - `ZSCORE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all
//! - `ZSCORE_RATE_LIMIT`: Requests per second (0 disables)
//! - `ZSCORE_API_KEY`: If set and non-empty, requires Bearer token authentication
//! - `ZSCORE_NORMS_FILE`: Normative table used by `/score` instead of the built-in one

use serde::{Deserialize, Serialize};
use std::path::Path;
use zscore_core::{NormativeData, ZScoreError};

/// Default rate limit in requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Maximum config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Maximum normative table size (1 MB).
const MAX_NORMS_FILE_SIZE: u64 = 1024 * 1024;

/// Runtime configuration of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second, 0 disables rate limiting.
    pub rate_limit: u32,
    /// Comma-separated origins or "*". `None` means localhost only.
    pub cors_origins: Option<String>,
    /// Bearer key. `None` disables authentication.
    pub api_key: Option<String>,
    /// Normative table JSON. `None` uses the built-in table.
    pub norms_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
            api_key: None,
            norms_file: None,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ZScoreError> {
        let mut config: ServerConfig =
            toml::from_str(contents).map_err(|e| ZScoreError::ConfigError(e.to_string()))?;
        config.api_key = config.api_key.filter(|k| !k.is_empty());
        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from defaults, then apply
    /// environment overrides.
    pub fn load(path: &Path) -> Result<Self, ZScoreError> {
        let mut config = if path.is_file() {
            let size = std::fs::metadata(path)
                .map_err(|e| ZScoreError::IoError(format!("Cannot read config metadata: {}", e)))?
                .len();
            if size > MAX_CONFIG_FILE_SIZE {
                return Err(ZScoreError::ConfigError(format!(
                    "Config file {} bytes exceeds maximum {} bytes",
                    size, MAX_CONFIG_FILE_SIZE
                )));
            }
            let contents = std::fs::read_to_string(path)
                .map_err(|e| ZScoreError::IoError(format!("Read config: {}", e)))?;
            tracing::info!("Loaded configuration from {}", path.display());
            Self::from_toml_str(&contents)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Override fields from environment-style lookups.
    ///
    /// Takes a lookup function so callers (and tests) control the source.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origins) = lookup("ZSCORE_CORS_ORIGINS") {
            self.cors_origins = Some(origins);
        }
        if let Some(limit) = lookup("ZSCORE_RATE_LIMIT") {
            match limit.parse() {
                Ok(rps) => self.rate_limit = rps,
                Err(_) => tracing::warn!("Ignoring invalid ZSCORE_RATE_LIMIT '{}'", limit),
            }
        }
        if let Some(key) = lookup("ZSCORE_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(file) = lookup("ZSCORE_NORMS_FILE").filter(|f| !f.is_empty()) {
            self.norms_file = Some(file);
        }
    }

    /// The configured normative table, or the built-in one.
    pub fn norms(&self) -> Result<NormativeData, ZScoreError> {
        match self.norms_file.as_deref() {
            Some(file) => load_norms(Path::new(file)),
            None => Ok(NormativeData::example()),
        }
    }

    /// `host:port` for binding.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read a `normative_data.json` table.
pub fn load_norms(path: &Path) -> Result<NormativeData, ZScoreError> {
    let size = std::fs::metadata(path)
        .map_err(|e| ZScoreError::IoError(format!("Cannot read norms file: {}", e)))?
        .len();
    if size > MAX_NORMS_FILE_SIZE {
        return Err(ZScoreError::ConfigError(format!(
            "Norms file {} bytes exceeds maximum {} bytes",
            size, MAX_NORMS_FILE_SIZE
        )));
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ZScoreError::IoError(format!("Read norms: {}", e)))?;
    let norms = NormativeData::from_json_str(&contents)?;
    tracing::info!("Loaded normative data from {}", path.display());
    Ok(norms)
}
