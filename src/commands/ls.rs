//! List command implementation

use super::{Command, CommandContext, validators};
use crate::config;
use crate::utils;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use serde::Serialize;

/// Output format for an input row in JSON mode
#[derive(Serialize)]
struct EntryOutput {
    name: String,
    country: String,
    organization: String,
    url: String,
}

/// List command for displaying input rows with optional group filtering
pub struct ListCommand {
    /// CSV listing `country,organization,repository_url`
    pub input: String,
    /// Output in JSON format
    pub json: bool,
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        validators::validate_input_file(&self.input)?;
        validators::validate_group_filters(&context.groups)?;

        let entries =
            utils::filter_by_groups(&config::load_entries(&self.input)?, &context.groups);

        if self.json {
            let output: Vec<EntryOutput> = entries
                .iter()
                .map(|entry| EntryOutput {
                    name: entry.name(),
                    country: entry.country.clone(),
                    organization: entry.organization.clone(),
                    url: entry.url.clone(),
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if entries.is_empty() {
            let filter_desc = if context.groups.is_empty() {
                "no repositories found".to_string()
            } else {
                format!("groups {:?}", context.groups)
            };
            println!(
                "{}",
                format!("No repositories found with {filter_desc}").yellow()
            );
            return Ok(());
        }

        println!(
            "{}",
            format!("Found {} repositories", entries.len()).green()
        );
        println!();

        for entry in &entries {
            println!("{} {}", "•".blue(), entry.name().bold());
            println!("  URL: {}", entry.url);
            println!(
                "  Group: {} / {}",
                entry.country.cyan(),
                entry.organization
            );
            println!();
        }

        println!(
            "{}",
            format!("Total: {} repositories", entries.len()).green()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Credentials};
    use std::fs;
    use tempfile::TempDir;

    fn create_input(dir: &TempDir) -> String {
        let path = dir.path().join("repo_links.csv");
        fs::write(
            &path,
            "country,org,repo_link\n\
             Brazil,gov-br,https://github.com/gov-br/portal.git\n\
             Chile,digital,https://github.com/digital/app\n",
        )
        .unwrap();
        path.to_string_lossy().to_string()
    }

    fn create_context(groups: Vec<String>) -> CommandContext {
        CommandContext {
            config: Config::default(),
            credentials: Credentials::default(),
            groups,
            debug: false,
        }
    }

    #[tokio::test]
    async fn test_list_command_all_entries() {
        let dir = TempDir::new().unwrap();
        let command = ListCommand {
            input: create_input(&dir),
            json: false,
        };

        assert!(command.execute(&create_context(vec![])).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_command_json_with_group_filter() {
        let dir = TempDir::new().unwrap();
        let command = ListCommand {
            input: create_input(&dir),
            json: true,
        };

        let context = create_context(vec!["chile".to_string()]);
        assert!(command.execute(&context).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_command_missing_input() {
        let command = ListCommand {
            input: "does-not-exist.csv".to_string(),
            json: false,
        };

        let result = command.execute(&create_context(vec![])).await;
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }
}
