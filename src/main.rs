use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skillgraph::cli;

#[derive(Parser)]
#[command(name = "skillgraph", version)]
#[command(about = "Aggregate coding activity into a skill profile and readiness report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest activity snapshots and print a readiness report
    Report {
        /// Learner identifier
        #[arg(default_value = "local")]
        learner: String,

        /// Path to a GitHub events snapshot (JSON array)
        #[arg(long)]
        github: Option<String>,

        /// Path to a LeetCode submissions snapshot (JSON array)
        #[arg(long)]
        leetcode: Option<String>,

        /// Path to config file (defaults to ./skillgraph.toml or ~/.config/skillgraph/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Include the LLM-written narrative
        #[arg(long)]
        narrative: bool,

        /// Use mock LLM client for testing
        #[arg(long)]
        dry_run: bool,
    },

    /// Ingest activity snapshots and dump the skill graph, DNA, and badges
    Graph {
        /// Learner identifier
        #[arg(default_value = "local")]
        learner: String,

        /// Path to a GitHub events snapshot (JSON array)
        #[arg(long)]
        github: Option<String>,

        /// Path to a LeetCode submissions snapshot (JSON array)
        #[arg(long)]
        leetcode: Option<String>,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Validate configuration and environment
    ConfigCheck {
        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            learner,
            github,
            leetcode,
            config,
            narrative,
            dry_run,
        } => {
            cli::report::run(learner, github, leetcode, config, narrative, dry_run).await?;
        }
        Commands::Graph {
            learner,
            github,
            leetcode,
            config,
        } => {
            cli::graph::run(learner, github, leetcode, config).await?;
        }
        Commands::ConfigCheck { config } => {
            cli::config_check::run(config)?;
        }
    }

    Ok(())
}
