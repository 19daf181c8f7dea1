//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate base URLs and value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before any explorer client is built

use std::fmt;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `bitcoin.timeout_secs`.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "bitcoin.base_url", &config.bitcoin.base_url);
    check_timeout(&mut errors, "bitcoin.timeout_secs", config.bitcoin.timeout_secs);

    check_url(&mut errors, "ethereum.base_url", &config.ethereum.base_url);
    check_timeout(&mut errors, "ethereum.timeout_secs", config.ethereum.timeout_secs);
    if let Some(key) = &config.ethereum.api_key {
        if key.trim().is_empty() {
            errors.push(ValidationError {
                field: "ethereum.api_key",
                message: "must not be empty when set".to_string(),
            });
        }
    }

    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: "must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, raw: &str) {
    match url::Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError {
            field,
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field,
            message: format!("invalid URL '{raw}': {e}"),
        }),
    }
}

fn check_timeout(errors: &mut Vec<ValidationError>, field: &'static str, secs: u64) {
    if secs == 0 {
        errors.push(ValidationError {
            field,
            message: "must be greater than 0".to_string(),
        });
    }
}
