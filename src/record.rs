//! The persisted per-repository record
//!
//! Every section has a zero-valued `Default` so that a record always
//! carries the full key set, whatever an analyzer managed to compute.

use crate::config::RepositoryEntry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Provenance of an analyzed repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub country: String,
    pub organization: String,
    pub repository_url: String,
}

impl From<&RepositoryEntry> for Metadata {
    fn from(entry: &RepositoryEntry) -> Self {
        Self {
            country: entry.country.clone(),
            organization: entry.organization.clone(),
            repository_url: entry.url.clone(),
        }
    }
}

/// Pattern hit counts and size/composition statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysis {
    pub sustainable: BTreeMap<String, u64>,
    pub unsustainable: BTreeMap<String, u64>,
    pub environmental: BTreeMap<String, u64>,
    pub social: BTreeMap<String, u64>,
    pub total_lines: u64,
    pub file_count: u64,
    /// extension (with leading dot) -> number of files
    pub file_types: BTreeMap<String, u64>,
    pub avg_file_size: f64,
    pub function_count: u64,
    pub class_count: u64,
    pub comment_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalsteadMetrics {
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    pub average: f64,
    pub max: u64,
    pub complex_functions: u64,
    pub maintainability_index: f64,
    pub halstead_metrics: HalsteadMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraphSummary {
    pub nodes: u64,
    pub edges: u64,
    pub avg_degree: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyAnalysis {
    pub total_dependencies: u64,
    pub direct_dependencies: u64,
    pub dev_dependencies: u64,
    /// Never computed; kept at zero for consumers that index it
    #[serde(default)]
    pub outdated_dependencies: u64,
    pub dependency_graph: DependencyGraphSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCoverage {
    pub has_tests: bool,
    pub test_files: u64,
    pub test_to_code_ratio: f64,
    pub test_lines: u64,
    pub test_frameworks: BTreeSet<String>,
    pub has_coverage_config: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitHistory {
    pub total_commits: u64,
    /// commits per week
    pub commit_frequency: f64,
    pub active_days: u64,
    pub contributors: u64,
    /// mean inserted + deleted lines per commit
    pub avg_commit_size: f64,
    /// fraction of commits with a well-formed subject, 0..=1
    pub commit_message_quality: f64,
    pub test_driven_commits: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoStructure {
    pub has_readme: bool,
    pub has_license: bool,
    pub has_gitignore: bool,
    pub has_ci_config: bool,
    pub has_dependency_manager: bool,
    pub has_docker: bool,
    pub has_contribution_guide: bool,
    pub has_code_of_conduct: bool,
    pub has_security_policy: bool,
    pub folder_depth: u64,
    pub dependency_count: u64,
    pub architecture_score: f64,
}

impl RepoStructure {
    pub const FLAG_COUNT: usize = 9;

    pub fn flags(&self) -> [bool; Self::FLAG_COUNT] {
        [
            self.has_readme,
            self.has_license,
            self.has_gitignore,
            self.has_ci_config,
            self.has_dependency_manager,
            self.has_docker,
            self.has_contribution_guide,
            self.has_code_of_conduct,
            self.has_security_policy,
        ]
    }

    /// Unweighted share of presence flags that are set
    pub fn compute_architecture_score(&self) -> f64 {
        let present = self.flags().iter().filter(|flag| **flag).count();
        present as f64 / Self::FLAG_COUNT as f64
    }
}

/// Language-model scores, each 0..=100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitativeScores {
    pub overall_sustainability: f64,
    pub documentation_quality: f64,
    pub testing_robustness: f64,
    pub modularity_and_design: f64,
    pub error_handling: f64,
    pub security_best_practices: f64,
    pub scalability_potential: f64,
    pub environmental_efficiency: f64,
    pub social_inclusiveness: f64,
    pub critical_issues: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

impl QualitativeScores {
    /// Clamp every score into 0..=100, mapping non-finite values to 0
    pub fn clamped(mut self) -> Self {
        for score in [
            &mut self.overall_sustainability,
            &mut self.documentation_quality,
            &mut self.testing_robustness,
            &mut self.modularity_and_design,
            &mut self.error_handling,
            &mut self.security_best_practices,
            &mut self.scalability_potential,
            &mut self.environmental_efficiency,
            &mut self.social_inclusiveness,
        ] {
            *score = if score.is_finite() {
                score.clamp(0.0, 100.0)
            } else {
                0.0
            };
        }
        self
    }
}

/// The `gemini_scores` section: full scores or a diagnostic payload
///
/// Variant order matters for deserialization: the diagnostic shapes have a
/// required field, the score shape accepts any object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeminiScores {
    Error { error: String },
    RawResponse { raw_response: String },
    Scores(QualitativeScores),
}

impl Default for GeminiScores {
    fn default() -> Self {
        GeminiScores::Scores(QualitativeScores::default())
    }
}

impl GeminiScores {
    pub fn error(message: impl Into<String>) -> Self {
        GeminiScores::Error {
            error: message.into(),
        }
    }

    pub fn scores(&self) -> Option<&QualitativeScores> {
        match self {
            GeminiScores::Scores(scores) => Some(scores),
            _ => None,
        }
    }
}

/// One analyzed repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub metadata: Metadata,
    pub code_analysis: CodeAnalysis,
    pub complexity_analysis: ComplexityAnalysis,
    pub dependency_analysis: DependencyAnalysis,
    pub test_coverage: TestCoverage,
    pub commit_history: CommitHistory,
    pub repo_structure: RepoStructure,
    pub gemini_scores: GeminiScores,
}
