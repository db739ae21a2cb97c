//! Common git utilities and shared helpers

use crate::config::RepositoryEntry;
use colored::*;

/// Logger for per-repository operations with consistent formatting
///
/// Each log message is prefixed with the repository name in cyan/bold for
/// easy identification in a long batch.
///
/// ## Example
///
/// ```rust,no_run
/// use repo_sustain::git::Logger;
/// use repo_sustain::config::RepositoryEntry;
///
/// let logger = Logger::default();
/// let entry = RepositoryEntry::new("Estonia", "e-gov", "https://github.com/e-gov/TARA-Server.git");
/// logger.info(&entry, "Starting analysis");
/// logger.success(&entry, "Analysis saved");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger {
    debug: bool,
}

impl Logger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn info(&self, entry: &RepositoryEntry, msg: &str) {
        println!("{} | {}", entry.name().cyan().bold(), msg);
    }

    pub fn success(&self, entry: &RepositoryEntry, msg: &str) {
        println!("{} | {}", entry.name().cyan().bold(), msg.green());
    }

    pub fn warn(&self, entry: &RepositoryEntry, msg: &str) {
        println!("{} | {}", entry.name().cyan().bold(), msg.yellow());
    }

    pub fn error(&self, entry: &RepositoryEntry, msg: &str) {
        eprintln!("{} | {}", entry.name().cyan().bold(), msg.red());
    }

    /// Only printed when debug output is enabled
    pub fn debug(&self, entry: &RepositoryEntry, msg: &str) {
        if self.debug {
            println!("{} | {}", entry.name().cyan().bold(), msg.dimmed());
        }
    }
}
