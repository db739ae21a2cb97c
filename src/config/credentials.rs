//! Credentials read from the environment once at startup

use super::Config;
use std::env;

/// Secrets for the hosting transport and the language model service
#[derive(Clone, Default)]
pub struct Credentials {
    pub hosting_token: Option<String>,
    pub model_api_key: Option<String>,
}

impl Credentials {
    /// Read credentials from the environment variables named in the config
    pub fn from_env(config: &Config) -> Self {
        Self {
            hosting_token: non_empty_var(&config.acquirer.token_env),
            model_api_key: non_empty_var(&config.qualitative.api_key_env),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("hosting_token", &redact(&self.hosting_token))
            .field("model_api_key", &redact(&self.model_api_key))
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
