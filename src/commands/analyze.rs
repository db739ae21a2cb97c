//! Analyze command: the batch orchestrator

use super::{Command, CommandContext, validators};
use crate::analysis::{DisabledModel, GeminiClient, LanguageModel, Radon};
use crate::config::{self, Config, RepositoryEntry};
use crate::git::Logger;
use crate::record::RepositoryRecord;
use crate::runner::{AnalysisRunner, Outcome};
use crate::utils;
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Analyze every input row, bounded by a per-country cap
pub struct AnalyzeCommand {
    /// CSV listing `country,organization,repository_url`
    pub input: String,
    /// Reuse records already present in the output directory
    pub skip_existing: bool,
}

/// Counts reported at the end of a batch
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchSummary {
    pub analyzed: usize,
    pub reused: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Rows not attempted because their group reached the cap
    pub capped: usize,
    pub combined_path: PathBuf,
}

impl BatchSummary {
    /// Records in the combined collection
    pub fn collected(&self) -> usize {
        self.analyzed + self.reused
    }
}

fn read_existing(path: &Path) -> Result<RepositoryRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid record in {}", path.display()))
}

impl AnalyzeCommand {
    /// Process `entries` in order and write the combined collection
    ///
    /// A single repository never aborts the batch; only writing the combined
    /// collection can fail.
    pub async fn run(
        &self,
        entries: &[RepositoryEntry],
        config: &Config,
        runner: &AnalysisRunner<'_>,
        logger: &Logger,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary {
            combined_path: config.combined_path(),
            ..BatchSummary::default()
        };
        let mut records: Vec<RepositoryRecord> = Vec::new();
        let mut per_group: HashMap<&str, usize> = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            let count = per_group.entry(entry.country.as_str()).or_insert(0);
            if *count >= config.max_per_group {
                logger.debug(
                    entry,
                    &format!("Cap of {} reached for {}", config.max_per_group, entry.country),
                );
                summary.capped += 1;
                continue;
            }

            logger.info(
                entry,
                &format!("Processing repository {}/{}: {}", index + 1, entries.len(), entry.url),
            );

            if self.skip_existing {
                let path = runner.record_path(entry);
                if path.is_file() {
                    match read_existing(&path) {
                        Ok(record) => {
                            logger.info(entry, &format!("Reusing {}", path.display()));
                            records.push(record);
                            *count += 1;
                            summary.reused += 1;
                            continue;
                        }
                        Err(e) => logger.warn(entry, &format!("{:#}; analyzing again", e)),
                    }
                }
            }

            match runner.analyze_entry(entry).await {
                Ok(Outcome::Analyzed { record, .. }) => {
                    records.push(*record);
                    *count += 1;
                    summary.analyzed += 1;
                }
                Ok(Outcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    logger.error(entry, &format!("{:#}", e));
                    summary.failed += 1;
                }
            }
        }

        utils::write_json(&summary.combined_path, &records)?;
        Ok(summary)
    }
}

#[async_trait]
impl Command for AnalyzeCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        validators::validate_input_file(&self.input)?;
        validators::validate_group_filters(&context.groups)?;

        let config = &context.config;
        let entries = utils::filter_by_groups(&config::load_entries(&self.input)?, &context.groups);

        if entries.is_empty() {
            println!("{}", "No repositories to analyze".yellow());
        } else {
            println!(
                "{}",
                format!("Found {} repositories in {}", entries.len(), self.input).green()
            );
        }

        utils::ensure_directory_exists(&config.output_path())?;

        let logger = Logger::new(context.debug);
        let radon = Radon::new(config.complexity.program.clone());
        let model: Box<dyn LanguageModel> = if config.qualitative.enabled {
            Box::new(GeminiClient::new(
                &config.qualitative,
                context.credentials.model_api_key.clone(),
            )?)
        } else {
            Box::new(DisabledModel)
        };

        let runner = AnalysisRunner::new(
            config,
            &context.credentials,
            &radon,
            model.as_ref(),
            logger,
        );
        let summary = self.run(&entries, config, &runner, &logger).await?;

        println!();
        println!(
            "{}",
            format!(
                "Analyzed {}, reused {}, skipped {}, failed {}, capped {}",
                summary.analyzed, summary.reused, summary.skipped, summary.failed, summary.capped
            )
            .green()
        );
        println!(
            "{}",
            format!(
                "Combined results ({} records) saved to {}",
                summary.collected(),
                summary.combined_path.display()
            )
            .green()
        );

        Ok(())
    }
}
