//! Sustainability analyzers
//!
//! Every analyzer reads the working copy and returns an [`Analysis`]: a
//! structurally complete section, possibly degraded with the reasons why.
//! No analyzer mutates the working copy or depends on another's output.

mod catalog;
mod complexity;
mod coverage;
mod dependencies;
mod files;
mod history;
mod patterns;
mod qualitative;
mod structure;

pub use catalog::{Catalogs, Category, PatternCatalog, catalogs};
pub use complexity::{
    ComplexityAnalyzer, ComplexityTool, CyclomaticSummary, Radon, parse_cyclomatic,
    parse_halstead, parse_maintainability,
};
pub use coverage::TestCoverageAnalyzer;
pub use dependencies::{DependencyAnalyzer, DependencyGraph};
pub use files::{EXCLUDED_DIRS, FileFilter, SourceFiles};
pub use history::{CommitHistoryAnalyzer, commit_frequency, is_good_message};
pub use patterns::PatternAnalyzer;
pub use qualitative::{
    DisabledModel, GeminiClient, LanguageModel, Payload, QualitativeScorer, parse_response,
};
pub use structure::StructureAnalyzer;

use crate::config::RepositoryEntry;
use crate::git::Logger;
use crate::record::{Metadata, RepositoryRecord};
use std::path::{Path, PathBuf};

/// Result of one analyzer: a section, complete or degraded
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis<T> {
    Complete(T),
    Degraded { section: T, reasons: Vec<String> },
}

impl<T> Analysis<T> {
    /// Complete when no reasons were collected, degraded otherwise
    pub fn from_parts(section: T, reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            Analysis::Complete(section)
        } else {
            Analysis::Degraded { section, reasons }
        }
    }

    pub fn section(&self) -> &T {
        match self {
            Analysis::Complete(section) | Analysis::Degraded { section, .. } => section,
        }
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            Analysis::Complete(_) => &[],
            Analysis::Degraded { reasons, .. } => reasons,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Analysis::Degraded { .. })
    }

    /// Unwrap the section, logging every degradation reason
    pub fn into_logged(self, name: &str, entry: &RepositoryEntry, logger: &Logger) -> T {
        match self {
            Analysis::Complete(section) => section,
            Analysis::Degraded { section, reasons } => {
                for reason in &reasons {
                    logger.warn(entry, &format!("{}: {}", name, reason));
                }
                section
            }
        }
    }
}

/// Runs every analyzer against one working copy and merges the sections
pub struct RepositoryAnalyzer<'a> {
    complexity_tool: &'a dyn ComplexityTool,
    scorer: QualitativeScorer<'a>,
    logger: Logger,
}

impl<'a> RepositoryAnalyzer<'a> {
    pub fn new(
        complexity_tool: &'a dyn ComplexityTool,
        scorer: QualitativeScorer<'a>,
        logger: Logger,
    ) -> Self {
        Self {
            complexity_tool,
            scorer,
            logger,
        }
    }

    /// Build a complete record for the working copy at `root`
    ///
    /// `files` is the File Classifier's output for the same root.
    pub async fn analyze(
        &self,
        entry: &RepositoryEntry,
        root: &Path,
        files: &[PathBuf],
    ) -> RepositoryRecord {
        let logger = &self.logger;

        logger.debug(entry, &format!("Scanning {} source files", files.len()));
        let code_analysis = PatternAnalyzer::new()
            .analyze(files)
            .into_logged("code_analysis", entry, logger);

        logger.debug(entry, "Running complexity tool");
        let complexity_analysis = ComplexityAnalyzer::new(self.complexity_tool)
            .analyze(root)
            .into_logged("complexity_analysis", entry, logger);

        logger.debug(entry, "Reading dependency manifests");
        let dependency_analysis = DependencyAnalyzer::new(root)
            .analyze()
            .into_logged("dependency_analysis", entry, logger);

        logger.debug(entry, "Classifying test files");
        let test_coverage = TestCoverageAnalyzer::new(root)
            .analyze()
            .into_logged("test_coverage", entry, logger);

        logger.debug(entry, "Querying commit history");
        let commit_history = CommitHistoryAnalyzer::new(root)
            .analyze()
            .into_logged("commit_history", entry, logger);

        logger.debug(entry, "Checking repository structure");
        let repo_structure = StructureAnalyzer::new(root)
            .analyze()
            .into_logged("repo_structure", entry, logger);

        logger.debug(entry, "Requesting qualitative scores");
        let gemini_scores = self
            .scorer
            .score(root, files)
            .await
            .into_logged("gemini_scores", entry, logger);

        RepositoryRecord {
            metadata: Metadata::from(entry),
            code_analysis,
            complexity_analysis,
            dependency_analysis,
            test_coverage,
            commit_history,
            repo_structure,
            gemini_scores,
        }
    }
}
