//! Configuration file loading and saving

use super::validation;
use crate::constants;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the external complexity tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityConfig {
    pub program: String,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            program: constants::complexity::DEFAULT_PROGRAM.to_string(),
        }
    }
}

/// Settings for the language-model scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitativeConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub max_total_chars: usize,
    pub max_attempts: u32,
    pub timeout_secs: u64,
}

impl Default for QualitativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: constants::qualitative::DEFAULT_ENDPOINT.to_string(),
            model: constants::qualitative::DEFAULT_MODEL.to_string(),
            api_key_env: constants::qualitative::DEFAULT_API_KEY_ENV.to_string(),
            max_total_chars: constants::qualitative::DEFAULT_MAX_TOTAL_CHARS,
            max_attempts: constants::qualitative::DEFAULT_MAX_ATTEMPTS,
            timeout_secs: constants::qualitative::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Settings for cloning repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquirerConfig {
    pub token_env: String,
}

impl Default for AcquirerConfig {
    fn default() -> Self {
        Self {
            token_env: constants::git::DEFAULT_TOKEN_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: String,
    pub combined_file: String,
    pub max_per_group: usize,
    pub complexity: ComplexityConfig,
    pub qualitative: QualitativeConfig,
    pub acquirer: AcquirerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: constants::config::DEFAULT_OUTPUT_DIR.to_string(),
            combined_file: constants::config::DEFAULT_COMBINED_FILE.to_string(),
            max_per_group: constants::config::DEFAULT_MAX_PER_GROUP,
            complexity: ComplexityConfig::default(),
            qualitative: QualitativeConfig::default(),
            acquirer: AcquirerConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        // An empty document deserializes to null, treat it as all defaults
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file if it exists, otherwise use defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, format!("---\n{}", yaml))?;
        Ok(())
    }

    /// Validate every setting, collecting all problems at once
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self).map_err(validation::validation_errors_to_anyhow)
    }

    /// Directory receiving one JSON document per analyzed repository
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }

    /// Path of the combined collection document
    pub fn combined_path(&self) -> PathBuf {
        self.output_path().join(&self.combined_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_per_group, 30);
        assert_eq!(config.qualitative.max_total_chars, 500_000);
        assert_eq!(
            config.combined_path(),
            PathBuf::from("analysis_results").join("all_results.json")
        );
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sustain.yaml");
        std::fs::write(
            &path,
            "max_per_group: 5\nqualitative:\n  model: gemini-1.5-pro\n",
        )
        .unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.max_per_group, 5);
        assert_eq!(config.qualitative.model, "gemini-1.5-pro");
        assert_eq!(config.qualitative.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.complexity.program, "radon");
    }

    #[test]
    fn test_load_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sustain.yaml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sustain.yaml");
        std::fs::write(&path, "max_per_group: 0\n").unwrap();

        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("max_per_group"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yaml");

        let config = Config::load_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sustain.yaml");
        let mut config = Config::default();
        config.output_dir = "results".to_string();

        config.save(path.to_str().unwrap()).unwrap();
        let loaded = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.output_dir, "results");
    }
}
