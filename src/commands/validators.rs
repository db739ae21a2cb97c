//! Command argument validation utilities
//!
//! Checks applied after clap parsing, for rules clap cannot express.

use anyhow::{Result, anyhow};
use std::path::Path;

/// Validation errors for command arguments
#[derive(Debug, PartialEq)]
pub enum CommandValidationError {
    /// Required file was not found
    MissingFile { argument: String, path: String },
    /// Invalid argument value
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for CommandValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandValidationError::MissingFile { argument, path } => {
                write!(f, "{} '{}' does not exist", argument, path)
            }
            CommandValidationError::InvalidValue {
                argument,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for {}: {}", value, argument, reason)
            }
        }
    }
}

impl std::error::Error for CommandValidationError {}

/// Convert validation error to anyhow::Error
pub fn validation_error_to_anyhow(error: CommandValidationError) -> anyhow::Error {
    anyhow!(error.to_string())
}

/// Ensure the input listing exists and is a regular file
pub fn validate_input_file(path: &str) -> Result<()> {
    if !Path::new(path).is_file() {
        return Err(validation_error_to_anyhow(
            CommandValidationError::MissingFile {
                argument: "input file".to_string(),
                path: path.to_string(),
            },
        ));
    }
    Ok(())
}

/// Ensure group filters are not empty when provided
pub fn validate_group_filters(groups: &[String]) -> Result<()> {
    for group in groups {
        if group.trim().is_empty() {
            return Err(validation_error_to_anyhow(
                CommandValidationError::InvalidValue {
                    argument: "group".to_string(),
                    value: group.clone(),
                    reason: "group cannot be empty or whitespace only".to_string(),
                },
            ));
        }
    }
    Ok(())
}

/// Ensure the output directory override is usable
pub fn validate_output_directory(output_dir: &Option<String>) -> Result<()> {
    if let Some(dir) = output_dir
        && dir.trim().is_empty()
    {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: "output-dir".to_string(),
                value: dir.clone(),
                reason: "output directory cannot be empty or whitespace only".to_string(),
            },
        ));
    }
    Ok(())
}

/// Ensure the per-group cap override admits at least one repository
pub fn validate_max_per_group(max_per_group: Option<usize>) -> Result<()> {
    if max_per_group == Some(0) {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: "max-per-group".to_string(),
                value: "0".to_string(),
                reason: "at least one repository per group is required".to_string(),
            },
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_input_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("repo_links.csv");
        std::fs::write(&file, "country,org,url\n").unwrap();

        assert!(validate_input_file(file.to_str().unwrap()).is_ok());
        assert!(validate_input_file(temp.path().to_str().unwrap()).is_err());

        let err = validate_input_file("missing.csv").unwrap_err();
        assert_eq!(err.to_string(), "input file 'missing.csv' does not exist");
    }

    #[test]
    fn test_validate_group_filters() {
        assert!(validate_group_filters(&[]).is_ok());
        assert!(validate_group_filters(&["Brazil".to_string()]).is_ok());

        let err = validate_group_filters(&["  ".to_string()]).unwrap_err();
        assert!(err.to_string().contains("group cannot be empty"));
    }

    #[test]
    fn test_validate_output_directory() {
        assert!(validate_output_directory(&None).is_ok());
        assert!(validate_output_directory(&Some("out".to_string())).is_ok());
        assert!(validate_output_directory(&Some("".to_string())).is_err());
    }

    #[test]
    fn test_validate_max_per_group() {
        assert!(validate_max_per_group(None).is_ok());
        assert!(validate_max_per_group(Some(5)).is_ok());
        assert!(validate_max_per_group(Some(0)).is_err());
    }
}
