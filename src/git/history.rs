//! Read-only version-control history queries
//!
//! Each query shells out to `git -C <root> ...` and parses the textual
//! output. Parsing lives in small pure functions so it can be tested
//! without a repository.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

/// Record separator placed in front of every commit by our log formats
const RECORD_SEPARATOR: char = '\u{1e}';

/// Subject line and touched paths of one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitChange {
    pub subject: String,
    pub files: Vec<String>,
}

fn run_git(root: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Total number of commits reachable from HEAD
pub fn commit_count(root: &Path) -> Result<u64> {
    let stdout = run_git(root, &["rev-list", "--count", "HEAD"])?;
    stdout
        .trim()
        .parse()
        .with_context(|| format!("Unexpected rev-list output: '{}'", stdout.trim()))
}

/// Author date of every commit at day granularity, newest first
pub fn commit_dates(root: &Path) -> Result<Vec<NaiveDate>> {
    let stdout = run_git(root, &["log", "--format=%ad", "--date=short"])?;
    parse_dates(&stdout)
}

/// Author e-mail of every commit
pub fn author_emails(root: &Path) -> Result<Vec<String>> {
    let stdout = run_git(root, &["log", "--format=%ae"])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Subject line and touched paths of every commit
pub fn commit_changes(root: &Path) -> Result<Vec<CommitChange>> {
    let stdout = run_git(root, &["log", "--format=%x1e%s", "--name-only"])?;
    Ok(parse_changes(&stdout))
}

/// Inserted plus deleted lines of every commit
pub fn commit_sizes(root: &Path) -> Result<Vec<u64>> {
    let stdout = run_git(root, &["log", "--format=%x1e", "--shortstat"])?;
    Ok(parse_shortstat(&stdout))
}

pub(crate) fn parse_dates(stdout: &str) -> Result<Vec<NaiveDate>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            NaiveDate::parse_from_str(line, "%Y-%m-%d")
                .with_context(|| format!("Invalid commit date: '{}'", line))
        })
        .collect()
}

pub(crate) fn parse_changes(stdout: &str) -> Vec<CommitChange> {
    stdout
        .split(RECORD_SEPARATOR)
        .filter(|record| !record.trim().is_empty())
        .map(|record| {
            let mut lines = record.lines();
            let subject = lines.next().unwrap_or_default().trim().to_string();
            let files = lines
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            CommitChange { subject, files }
        })
        .collect()
}

pub(crate) fn parse_shortstat(stdout: &str) -> Vec<u64> {
    static INSERTIONS: OnceLock<Regex> = OnceLock::new();
    static DELETIONS: OnceLock<Regex> = OnceLock::new();
    let insertions = INSERTIONS.get_or_init(|| {
        Regex::new(r"(\d+) insertions?\(\+\)").expect("static regex is valid")
    });
    let deletions = DELETIONS
        .get_or_init(|| Regex::new(r"(\d+) deletions?\(-\)").expect("static regex is valid"));

    let capture = |re: &Regex, text: &str| -> u64 {
        re.captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    stdout
        .split(RECORD_SEPARATOR)
        .skip(1)
        .map(|record| capture(insertions, record) + capture(deletions, record))
        .collect()
}
