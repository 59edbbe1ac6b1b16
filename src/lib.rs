//! Webpulse: a concurrent page surveyor
//!
//! This crate fetches a fixed list of web pages through a bounded worker pool,
//! retries transient failures with exponential backoff, extracts headline
//! content from each page, and aggregates everything into a single report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Webpulse operations
///
/// Per-URL fetch failures never show up here; they are recorded inside
/// [`crawler::ScrapeResult`]. These are the errors that stop a run.
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Empty URL")]
    Empty,
}

/// Result type alias for Webpulse operations
pub type Result<T> = std::result::Result<T, PulseError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_pipeline, AggregateReport, ScrapeResult, SiteInfo};
pub use crate::url::{ensure_scheme, validate_target};
