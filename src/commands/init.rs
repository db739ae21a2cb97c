//! Init command implementation

use super::{Command, CommandContext};
use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use std::path::Path;

/// Init command for writing a configuration file with every default spelled out
pub struct InitCommand {
    pub output: String,
    pub overwrite: bool,
}

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, _context: &CommandContext) -> Result<()> {
        if Path::new(&self.output).exists() && !self.overwrite {
            return Err(anyhow::anyhow!(
                "Output file '{}' already exists. Use --overwrite to replace it.",
                self.output
            ));
        }

        Config::default().save(&self.output)?;

        println!(
            "{}",
            format!("Configuration saved to '{}'", self.output).green()
        );

        Ok(())
    }
}
