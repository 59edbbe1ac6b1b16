use crate::config::types::{Config, OutputConfig, ScraperConfig, TargetsConfig};
use crate::url::validate_target;
use crate::ConfigError;

/// Upper bound on the worker count
const MAX_CONCURRENCY: usize = 500;

/// Upper bound on attempts per URL
const MAX_ATTEMPTS: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_targets(&config.targets)?;
    Ok(())
}

/// Validates fetch pipeline configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_attempts < 1 || config.max_attempts > MAX_ATTEMPTS {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and {}, got {}",
            MAX_ATTEMPTS, config.max_attempts
        )));
    }

    if config.backoff_base_secs < 1 {
        return Err(ConfigError::Validation(
            "backoff_base_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    if let Some(log_path) = &config.log_path {
        if log_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "log_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the target list
fn validate_targets(targets: &TargetsConfig) -> Result<(), ConfigError> {
    if targets.urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one target URL is required".to_string(),
        ));
    }

    for target in &targets.urls {
        validate_target(target).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid target '{}': {}", target, e))
        })?;
    }

    Ok(())
}
