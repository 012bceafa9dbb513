//! jobskills CLI
//!
//! Collects job postings for a search and tallies the skills they mention.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobskills::{
    error::Result,
    models::{Config, SearchQuery},
    pipeline,
    services::SkillRegistry,
    storage::LocalStorage,
    utils::http,
};

/// jobskills - Job Posting Skill Collector
#[derive(Parser, Debug)]
#[command(
    name = "jobskills",
    version,
    about = "Collect job postings and count the skills they ask for"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect postings and write the report tables
    Collect {
        /// Location to search in
        #[arg(short, long)]
        location: String,

        /// Job title to search for
        #[arg(short, long, default_value = SearchQuery::DEFAULT_TITLE)]
        title: String,

        /// Number of job postings to fetch
        #[arg(short = 'n', long = "num-jobs", default_value_t = 600)]
        num_jobs: usize,

        /// Output directory (default: paths.output_dir from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skills CSV (default: paths.skills_file from config)
        #[arg(long)]
        skills: Option<PathBuf>,
    },

    /// Validate configuration and the skill registry
    Validate {
        /// Skills CSV (default: paths.skills_file from config)
        #[arg(long)]
        skills: Option<PathBuf>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Collect {
            location,
            title,
            num_jobs,
            output,
            skills,
        } => {
            if let Some(path) = output {
                config.paths.output_dir = path;
            }
            if let Some(path) = skills {
                config.paths.skills_file = path;
            }
            config.validate()?;

            let client = http::create_async_client(&config.crawler)?;
            let storage = LocalStorage::new(&config.paths.output_dir);
            let query = SearchQuery::new(title, location);

            let report =
                pipeline::run_pipeline(&config, &client, &storage, &query, num_jobs).await?;

            log::info!(
                "Collected {} postings; {} skills seen",
                report.postings.len(),
                report.skill_usage.len()
            );
        }

        Command::Validate { skills } => {
            if let Some(path) = skills {
                config.paths.skills_file = path;
            }

            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let registry = SkillRegistry::load(&config.paths.skills_file)?;
            log::info!("✓ Skill registry OK ({} skills)", registry.len());
        }
    }

    log::info!("Done!");

    Ok(())
}
