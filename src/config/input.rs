//! Tabular input listing the repositories to analyze
//!
//! The input is a CSV document with a header row followed by
//! `country,organization,repository_url` rows. Fields may be double-quoted,
//! and a quoted field may span several lines.

use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};

/// One repository to analyze together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub country: String,
    pub organization: String,
    pub url: String,
}

impl RepositoryEntry {
    pub fn new(country: &str, organization: &str, url: &str) -> Self {
        Self {
            country: country.to_string(),
            organization: organization.to_string(),
            url: url.to_string(),
        }
    }

    /// Repository name taken from the last URL path segment
    pub fn name(&self) -> String {
        let trimmed = self.url.trim_end_matches('/');
        let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
        last.strip_suffix(".git").unwrap_or(last).to_string()
    }
}

/// Rows accepted from the input and rows rejected with a reason
#[derive(Debug, Default)]
pub struct ParsedInput {
    pub entries: Vec<RepositoryEntry>,
    /// (1-based line number, reason)
    pub rejected: Vec<(usize, String)>,
}

/// Parse CSV content, skipping the header row
pub fn parse_entries(content: &str) -> ParsedInput {
    let mut parsed = ParsedInput::default();

    for (line_number, record) in csv_records(content).into_iter().skip(1) {
        if record.trim().is_empty() {
            continue;
        }

        let fields = split_csv_line(&record);
        if fields.len() < 3 {
            parsed.rejected.push((
                line_number,
                format!("expected 3 fields, found {}", fields.len()),
            ));
            continue;
        }

        let url = fields[2].trim();
        if url.is_empty() {
            parsed
                .rejected
                .push((line_number, "repository URL is empty".to_string()));
            continue;
        }

        parsed
            .entries
            .push(RepositoryEntry::new(fields[0].trim(), fields[1].trim(), url));
    }

    parsed
}

/// Load repository entries from a CSV file, warning about rejected rows
pub fn load_entries(path: &str) -> Result<Vec<RepositoryEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path))?;

    let parsed = parse_entries(&content);
    for (line, reason) in &parsed.rejected {
        eprintln!(
            "{}",
            format!("{}:{} skipped: {}", path, line, reason).yellow()
        );
    }

    Ok(parsed.entries)
}

/// Group physical lines into records, keeping open quotes spanning newlines
///
/// Each record carries the 1-based line number it starts on.
fn csv_records(content: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, line) in content.lines().enumerate() {
        let (start, mut record) = match pending.take() {
            Some((start, mut record)) => {
                record.push('\n');
                (start, record)
            }
            None => (index + 1, String::new()),
        };
        record.push_str(line);

        // An escaped quote adds two, so odd parity means a field is still open
        if record.matches('"').count() % 2 == 1 {
            pending = Some((start, record));
        } else {
            records.push((start, record));
        }
    }
    records.extend(pending);

    records
}

/// Split one CSV record into fields, honoring double quotes
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
