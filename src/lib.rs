//! Repo Sustain - clone repositories and score their technical sustainability

pub mod analysis;
pub mod commands;
pub mod config;
pub mod constants;
pub mod git;
pub mod record;
pub mod runner;
pub mod utils;

pub type Result<T> = anyhow::Result<T>;

// Re-export commonly used types
pub use commands::{Command, CommandContext};
pub use config::{Config, Credentials, RepositoryEntry};
pub use record::RepositoryRecord;

