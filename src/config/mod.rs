//! Configuration module for Webpulse
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so an empty file (or no file at all) describes a
//! complete run against the built-in target list.
//!
//! # Example
//!
//! ```no_run
//! use webpulse::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webpulse.toml")).unwrap();
//! println!("Scraper will use {} workers", config.scraper.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, ScraperConfig, TargetsConfig, DEFAULT_TARGETS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
