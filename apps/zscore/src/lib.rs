//! # zscore
//!
//! Library half of the zscore binary: HTTP API, CLI and configuration.
//! Split out so integration tests can build the router directly.

pub mod api;
pub mod cli;
pub mod config;
