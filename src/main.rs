use anyhow::Result;
use clap::{Parser, Subcommand};
use repo_sustain::commands::validators;
use repo_sustain::{commands::*, config::Config, config::Credentials, constants};

#[derive(Parser)]
#[command(name = "repo-sustain")]
#[command(about = "Clone repositories and score their technical sustainability")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every repository listed in the input file
    Analyze {
        /// CSV file with `country,organization,repository_url` rows
        #[arg(default_value_t = constants::config::DEFAULT_INPUT_FILE.to_string())]
        input: String,

        /// Configuration file path
        #[arg(short, long, default_value_t = constants::config::DEFAULT_CONFIG_FILE.to_string())]
        config: String,

        /// Directory for per-repository records and the combined file
        #[arg(long)]
        output_dir: Option<String>,

        /// Maximum number of repositories analyzed per country
        #[arg(long)]
        max_per_group: Option<usize>,

        /// Only analyze repositories from these countries (can be specified multiple times)
        #[arg(short = 'g', long = "group")]
        groups: Vec<String>,

        /// Reuse records already present in the output directory
        #[arg(long)]
        skip_existing: bool,

        /// Skip the language model request
        #[arg(long)]
        no_llm: bool,

        /// Print per-analyzer progress
        #[arg(short, long)]
        debug: bool,
    },

    /// List repositories in the input file
    Ls {
        /// CSV file with `country,organization,repository_url` rows
        #[arg(default_value_t = constants::config::DEFAULT_INPUT_FILE.to_string())]
        input: String,

        /// Only list repositories from these countries (can be specified multiple times)
        #[arg(short = 'g', long = "group")]
        groups: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with the default settings
    Init {
        /// Output file name
        #[arg(short, long, default_value_t = constants::config::DEFAULT_CONFIG_FILE.to_string())]
        output: String,

        /// Overwrite existing file if it exists
        #[arg(long)]
        overwrite: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    execute_command(cli.command).await
}

async fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze {
            input,
            config,
            output_dir,
            max_per_group,
            groups,
            skip_existing,
            no_llm,
            debug,
        } => {
            let mut config = Config::load_or_default(&config)?;

            validators::validate_output_directory(&output_dir)?;
            validators::validate_max_per_group(max_per_group)?;
            validators::validate_group_filters(&groups)?;

            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(max_per_group) = max_per_group {
                config.max_per_group = max_per_group;
            }
            if no_llm {
                config.qualitative.enabled = false;
            }
            config.validate()?;

            let context = CommandContext {
                credentials: Credentials::from_env(&config),
                config,
                groups,
                debug,
            };
            AnalyzeCommand {
                input,
                skip_existing,
            }
            .execute(&context)
            .await?;
        }
        Commands::Ls {
            input,
            groups,
            json,
        } => {
            validators::validate_group_filters(&groups)?;

            // Listing never reads a config file or credentials
            let context = CommandContext {
                config: Config::new(),
                credentials: Credentials::default(),
                groups,
                debug: false,
            };
            ListCommand { input, json }.execute(&context).await?;
        }
        Commands::Init { output, overwrite } => {
            let context = CommandContext {
                config: Config::new(),
                credentials: Credentials::default(),
                groups: Vec::new(),
                debug: false,
            };
            InitCommand { output, overwrite }.execute(&context).await?;
        }
    }

    Ok(())
}
