//! Configuration validation utilities
//!
//! All problems are collected before reporting so a broken config file can be
//! fixed in one pass.

use super::Config;
use anyhow::{Result, anyhow};

/// Enumeration of possible validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required string setting is empty
    EmptySetting(&'static str),
    /// A numeric setting must be at least one
    ZeroSetting(&'static str),
    /// The model endpoint is not an http(s) URL
    InvalidEndpoint(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptySetting(name) => write!(f, "Setting '{}' cannot be empty", name),
            ValidationError::ZeroSetting(name) => {
                write!(f, "Setting '{}' must be at least 1", name)
            }
            ValidationError::InvalidEndpoint(endpoint) => {
                write!(f, "Endpoint must start with http:// or https://: '{}'", endpoint)
            }
        }
    }
}

/// Validates a complete configuration object
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("output_dir", config.output_dir.as_str()),
        ("combined_file", config.combined_file.as_str()),
        ("complexity.program", config.complexity.program.as_str()),
        ("qualitative.model", config.qualitative.model.as_str()),
        ("qualitative.api_key_env", config.qualitative.api_key_env.as_str()),
        ("acquirer.token_env", config.acquirer.token_env.as_str()),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::EmptySetting(name));
        }
    }

    if config.max_per_group == 0 {
        errors.push(ValidationError::ZeroSetting("max_per_group"));
    }
    if config.qualitative.max_total_chars == 0 {
        errors.push(ValidationError::ZeroSetting("qualitative.max_total_chars"));
    }
    if config.qualitative.max_attempts == 0 {
        errors.push(ValidationError::ZeroSetting("qualitative.max_attempts"));
    }
    if config.qualitative.timeout_secs == 0 {
        errors.push(ValidationError::ZeroSetting("qualitative.timeout_secs"));
    }

    let endpoint = &config.qualitative.endpoint;
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        errors.push(ValidationError::InvalidEndpoint(endpoint.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Convert validation errors to a single anyhow error
pub fn validation_errors_to_anyhow(errors: Vec<ValidationError>) -> anyhow::Error {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    anyhow!("Configuration validation failed:\n  {}", messages.join("\n  "))
}
