//! Common test support utilities and fixtures
//!
//! Shared helpers for the pipeline and CLI integration tests: a temporary
//! workspace, local git repositories to clone from, and scripted stand-ins
//! for the external complexity tool and language model.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use repo_sustain::analysis::{ComplexityTool, CyclomaticSummary, LanguageModel};
use repo_sustain::config::{Config, RepositoryEntry};
use repo_sustain::record::HalsteadMetrics;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A test workspace with an input file, sources and an output directory
pub struct Workspace {
    pub root: TempDir,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path().join("analysis_results")
    }

    /// Config writing into this workspace, language model enabled
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.output_dir = self.output_dir().to_string_lossy().to_string();
        config
    }

    /// Create a committed git repository named `name` with the given files
    pub fn source_repo(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = self.path().join("sources").join(name);
        init_git_repo(&dir, files).expect("Failed to initialize git repo");
        dir
    }

    /// Write the CSV input listing and return its path
    pub fn write_input(&self, entries: &[RepositoryEntry]) -> PathBuf {
        let mut content = String::from("country,org,repo_link\n");
        for entry in entries {
            content.push_str(&format!(
                "{},{},{}\n",
                entry.country, entry.organization, entry.url
            ));
        }
        let path = self.path().join("repo_links.csv");
        fs::write(&path, content).expect("Failed to write input");
        path
    }

    pub fn read_json(&self, file: &str) -> serde_json::Value {
        let data = fs::read(self.output_dir().join(file)).expect("Failed to read output");
        serde_json::from_slice(&data).expect("Failed to parse output")
    }
}

fn git(path: &Path, args: &[&str]) -> std::io::Result<()> {
    let output = Command::new("git").args(args).current_dir(path).output()?;
    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(())
}

/// Initialize a git repository and commit `files` in one commit
pub fn init_git_repo(path: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
    fs::create_dir_all(path)?;

    git(path, &["init", "--quiet"])?;
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "user.email", "test@example.com"])?;
    git(path, &["config", "commit.gpgsign", "false"])?;

    for (rel, content) in files {
        let file = path.join(rel);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(file, content)?;
    }

    git(path, &["add", "--all"])?;
    git(path, &["commit", "--quiet", "-m", "Initial commit"])?;
    Ok(())
}

/// Entry pointing at a local repository path
pub fn local_entry(country: &str, repo: &Path) -> RepositoryEntry {
    RepositoryEntry::new(country, "test-org", &repo.to_string_lossy())
}

/// Language model answering every prompt with the same text
pub struct FixedModel(pub String);

#[async_trait]
impl LanguageModel for FixedModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Language model failing every request like a broken transport
pub struct FailingModel(pub &'static str);

#[async_trait]
impl LanguageModel for FailingModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("{}", self.0)
    }
}

/// Complexity tool reporting fixed values
pub struct StubComplexity;

impl ComplexityTool for StubComplexity {
    fn cyclomatic(&self, _root: &Path) -> Result<CyclomaticSummary> {
        Ok(CyclomaticSummary {
            average: 2.5,
            max: 12,
            complex_functions: 1,
        })
    }

    fn maintainability(&self, _root: &Path) -> Result<f64> {
        Ok(71.0)
    }

    fn halstead(&self, _root: &Path) -> Result<HalsteadMetrics> {
        Ok(HalsteadMetrics {
            volume: 30.0,
            difficulty: 1.5,
            effort: 45.0,
        })
    }
}

pub const SCORES_JSON: &str = r#"{"overall_sustainability": 70, "documentation_quality": 60,
  "testing_robustness": 50, "modularity_and_design": 65, "error_handling": 55,
  "security_best_practices": 45, "scalability_potential": 40,
  "environmental_efficiency": 35, "social_inclusiveness": 30,
  "critical_issues": ["few tests"], "improvement_suggestions": ["add CI"]}"#;

/// Dotted key paths of a JSON document, not descending into arrays
pub fn flatten_keys(value: &serde_json::Value) -> Vec<String> {
    fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
        match value.as_object() {
            Some(map) if !map.is_empty() => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    walk(&path, child, out);
                }
            }
            _ => out.push(prefix.to_string()),
        }
    }

    let mut keys = Vec::new();
    walk("", value, &mut keys);
    keys.sort();
    keys
}
