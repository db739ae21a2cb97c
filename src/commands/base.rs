//! Base types and traits for the command pattern

use crate::config::{Config, Credentials};
use anyhow::Result;

/// Context passed to all commands containing shared configuration and options
#[derive(Clone, Debug)]
pub struct CommandContext {
    /// The loaded configuration, with command line overrides applied
    pub config: Config,
    /// Credentials read from the environment
    pub credentials: Credentials,
    /// Country filters for input rows (empty means all)
    pub groups: Vec<String>,
    /// Whether to print per-analyzer progress
    pub debug: bool,
}

/// Trait that all commands must implement
#[async_trait::async_trait]
pub trait Command {
    /// Execute the command with the given context
    async fn execute(&self, context: &CommandContext) -> Result<()>;
}
