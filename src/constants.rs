//! Central constants for the repo-sustain application

/// Default values for configuration
pub mod config {
    /// Default configuration file name
    pub const DEFAULT_CONFIG_FILE: &str = "sustain.yaml";

    /// Default CSV input listing `country,organization,repository_url`
    pub const DEFAULT_INPUT_FILE: &str = "repo_links.csv";

    /// Default output directory for per-repository records
    pub const DEFAULT_OUTPUT_DIR: &str = "analysis_results";

    /// Default name of the combined collection file
    pub const DEFAULT_COMBINED_FILE: &str = "all_results.json";

    /// Default number of repositories analyzed per provenance group
    pub const DEFAULT_MAX_PER_GROUP: usize = 30;
}

/// Default values for the repository acquirer
pub mod git {
    /// Environment variable holding the hosting API token
    pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

    /// Name of the working copy directory inside each scoped temp dir
    pub const CHECKOUT_DIR: &str = "repo";
}

/// Default values for the complexity analyzer
pub mod complexity {
    /// External complexity tool
    pub const DEFAULT_PROGRAM: &str = "radon";
}

/// Default values for the qualitative scorer
pub mod qualitative {
    /// Language model REST endpoint
    pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Language model name
    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

    /// Environment variable holding the language model API key
    pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

    /// Total character budget for sampled source content
    pub const DEFAULT_MAX_TOTAL_CHARS: usize = 500_000;

    /// Attempts per request before giving up
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

    /// Request timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// User-Agent header for model requests
    pub const DEFAULT_USER_AGENT: &str = concat!("repo-sustain/", env!("CARGO_PKG_VERSION"));
}
