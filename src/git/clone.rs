//! Git clone operations
//!
//! The acquirer performs a full clone of the default branch into a target
//! directory owned by the caller. The caller decides what a failure means;
//! here it is only reported.

use crate::config::RepositoryEntry;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use url::Url;

use super::common::Logger;

/// Clone a repository into `target_dir`, which must not exist or be empty
pub fn clone_repository(
    entry: &RepositoryEntry,
    target_dir: &Path,
    token: Option<&str>,
    logger: &Logger,
) -> Result<()> {
    if target_dir.exists()
        && std::fs::read_dir(target_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(true)
    {
        anyhow::bail!(
            "Clone target is not empty: {}",
            target_dir.display()
        );
    }

    logger.info(entry, &format!("Cloning default branch from {}", entry.url));

    let clone_url = authenticated_url(&entry.url, token);
    let output = Command::new("git")
        .arg("clone")
        .arg("--quiet")
        .arg(&clone_url)
        .arg(target_dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .context("Failed to execute git clone command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = match token {
            Some(token) if !token.is_empty() => stderr.replace(token, "***"),
            _ => stderr.into_owned(),
        };
        anyhow::bail!("Failed to clone repository: {}", stderr.trim());
    }

    logger.debug(entry, "Successfully cloned");
    Ok(())
}

/// Embed a hosting token into an https clone URL
///
/// Other schemes (ssh, file paths) and URLs that already carry credentials are
/// returned unchanged.
pub fn authenticated_url(url: &str, token: Option<&str>) -> String {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return url.to_string();
    };

    match Url::parse(url) {
        Ok(mut parsed) if parsed.scheme() == "https" && parsed.username().is_empty() => {
            if parsed.set_username("oauth2").is_ok() && parsed.set_password(Some(token)).is_ok() {
                parsed.to_string()
            } else {
                url.to_string()
            }
        }
        _ => url.to_string(),
    }
}
