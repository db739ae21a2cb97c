//! Commit history analyzer
//!
//! Each sub-metric comes from its own `git log` query, so one failed query
//! only zeroes the fields it feeds.

use super::Analysis;
use crate::git::{self, CommitChange};
use crate::record::CommitHistory;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Commits per week over the span between the first and last commit day
///
/// The span is floored at one week, so a single-day history yields
/// `total_commits` itself.
pub fn commit_frequency(total_commits: u64, dates: &[NaiveDate]) -> f64 {
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return 0.0;
    };
    let span_days = (*last - *first).num_days() as f64;
    let weeks = (span_days / 7.0).max(1.0);
    total_commits as f64 / weeks
}

/// Conventional-commit prefix, a leading capital, or at least ten characters
pub fn is_good_message(subject: &str) -> bool {
    static CONVENTIONAL: OnceLock<Regex> = OnceLock::new();
    let conventional = CONVENTIONAL.get_or_init(|| {
        Regex::new(r"^(feat|fix|docs|style|refactor|test|chore)(\(.+\))?:")
            .expect("valid conventional commit regex")
    });

    conventional.is_match(subject)
        || subject.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        || subject.chars().count() >= 10
}

fn touches_tests(change: &CommitChange) -> bool {
    change
        .files
        .iter()
        .any(|path| path.to_lowercase().contains("test"))
}

pub struct CommitHistoryAnalyzer {
    root: PathBuf,
}

impl CommitHistoryAnalyzer {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn analyze(&self) -> Analysis<CommitHistory> {
        let root = self.root.as_path();
        let mut section = CommitHistory::default();
        let mut reasons = Vec::new();

        match git::commit_count(root) {
            Ok(count) => section.total_commits = count,
            Err(e) => reasons.push(format!("commit count: {:#}", e)),
        }

        match git::commit_dates(root) {
            Ok(dates) => {
                section.active_days = dates.iter().collect::<HashSet<_>>().len() as u64;
                section.commit_frequency = commit_frequency(section.total_commits, &dates);
            }
            Err(e) => reasons.push(format!("commit dates: {:#}", e)),
        }

        match git::author_emails(root) {
            Ok(emails) => {
                section.contributors = emails.iter().collect::<HashSet<_>>().len() as u64;
            }
            Err(e) => reasons.push(format!("contributors: {:#}", e)),
        }

        match git::commit_sizes(root) {
            Ok(sizes) if !sizes.is_empty() => {
                section.avg_commit_size = sizes.iter().sum::<u64>() as f64 / sizes.len() as f64;
            }
            Ok(_) => {}
            Err(e) => reasons.push(format!("commit sizes: {:#}", e)),
        }

        match git::commit_changes(root) {
            Ok(changes) => {
                let denominator = if section.total_commits > 0 {
                    section.total_commits
                } else {
                    changes.len() as u64
                };
                if denominator > 0 {
                    let good = changes.iter().filter(|c| is_good_message(&c.subject)).count();
                    section.commit_message_quality = (good as f64 / denominator as f64).min(1.0);
                }
                section.test_driven_commits =
                    changes.iter().filter(|c| touches_tests(c)).count() as u64;
            }
            Err(e) => reasons.push(format!("commit messages: {:#}", e)),
        }

        Analysis::from_parts(section, reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_single_day_history_floors_at_one_week() {
        assert_eq!(commit_frequency(1, &[day("2024-03-01")]), 1.0);
        assert_eq!(
            commit_frequency(4, &[day("2024-03-01"), day("2024-03-03")]),
            4.0
        );
    }

    #[test]
    fn test_multi_week_frequency() {
        let dates = [day("2024-03-29"), day("2024-03-15"), day("2024-03-01")];
        assert!((commit_frequency(6, &dates) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history_frequency() {
        assert_eq!(commit_frequency(0, &[]), 0.0);
    }

    #[test]
    fn test_is_good_message() {
        assert!(is_good_message("fix: x"));
        assert!(is_good_message("feat(api): y"));
        assert!(is_good_message("Update"));
        assert!(is_good_message("bump version numbers"));
        assert!(!is_good_message("wip"));
        assert!(!is_good_message(""));
    }

    #[test]
    fn test_touches_tests_is_case_insensitive() {
        let change = CommitChange {
            subject: "x".to_string(),
            files: vec!["src/UserTests.java".to_string()],
        };
        assert!(touches_tests(&change));
    }

    #[test]
    fn test_not_a_repository_degrades_to_defaults() {
        let dir = TempDir::new().unwrap();
        let analysis = CommitHistoryAnalyzer::new(dir.path()).analyze();

        assert!(analysis.is_degraded());
        assert_eq!(*analysis.section(), CommitHistory::default());
    }
}
