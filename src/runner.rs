//! Per-repository orchestration: acquire, classify, analyze, persist

use crate::analysis::{ComplexityTool, LanguageModel, QualitativeScorer, RepositoryAnalyzer, SourceFiles};
use crate::config::{Config, Credentials, RepositoryEntry};
use crate::constants;
use crate::git::{self, Logger};
use crate::record::RepositoryRecord;
use crate::utils;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A cloned repository inside a scoped temporary directory
///
/// The checkout is removed when the value is dropped, on every exit path.
pub struct WorkingCopy {
    _dir: TempDir,
    root: PathBuf,
}

impl WorkingCopy {
    /// Clone `entry` into a fresh temporary directory
    pub fn acquire(entry: &RepositoryEntry, token: Option<&str>, logger: &Logger) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("repo-sustain-")
            .tempdir()
            .context("Failed to create temporary directory")?;
        let root = dir.path().join(constants::git::CHECKOUT_DIR);

        git::clone_repository(entry, &root, token, logger)?;

        Ok(Self { _dir: dir, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// What happened to one input row
#[derive(Debug)]
pub enum Outcome {
    Analyzed {
        record: Box<RepositoryRecord>,
        path: PathBuf,
    },
    /// Not analyzed; nothing was written
    Skipped(String),
}

pub struct AnalysisRunner<'a> {
    config: &'a Config,
    credentials: &'a Credentials,
    complexity_tool: &'a dyn ComplexityTool,
    model: &'a dyn LanguageModel,
    logger: Logger,
}

impl<'a> AnalysisRunner<'a> {
    pub fn new(
        config: &'a Config,
        credentials: &'a Credentials,
        complexity_tool: &'a dyn ComplexityTool,
        model: &'a dyn LanguageModel,
        logger: Logger,
    ) -> Self {
        Self {
            config,
            credentials,
            complexity_tool,
            model,
            logger,
        }
    }

    /// Where the record for `entry` is persisted
    pub fn record_path(&self, entry: &RepositoryEntry) -> PathBuf {
        self.config
            .output_path()
            .join(utils::record_file_name(&entry.country, &entry.name()))
    }

    /// Analyze one repository and persist its record
    ///
    /// Acquisition failures and empty checkouts are `Skipped`; only a failure
    /// to write the record is returned as an error.
    pub async fn analyze_entry(&self, entry: &RepositoryEntry) -> Result<Outcome> {
        let logger = &self.logger;

        let working_copy =
            match WorkingCopy::acquire(entry, self.credentials.hosting_token.as_deref(), logger) {
                Ok(working_copy) => working_copy,
                Err(e) => {
                    let reason = format!("{:#}", e);
                    logger.error(entry, &reason);
                    return Ok(Outcome::Skipped(reason));
                }
            };

        let files: Vec<PathBuf> = SourceFiles::source(working_copy.root()).collect();
        if files.is_empty() {
            let reason = "No code files found".to_string();
            logger.warn(entry, &reason);
            return Ok(Outcome::Skipped(reason));
        }
        logger.info(entry, &format!("Analyzing {} source files", files.len()));

        let scorer = QualitativeScorer::from_config(self.model, &self.config.qualitative);
        let analyzer = RepositoryAnalyzer::new(self.complexity_tool, scorer, self.logger);
        let record = analyzer.analyze(entry, working_copy.root(), &files).await;

        // Release the checkout before writing
        drop(working_copy);

        let path = self.record_path(entry);
        utils::write_json(&path, &record)
            .with_context(|| format!("Failed to persist record for {}", entry.url))?;
        logger.success(entry, &format!("Saved {}", path.display()));

        Ok(Outcome::Analyzed {
            record: Box::new(record),
            path,
        })
    }
}
