//! branchdiff CLI
//!
//! Command-line interface for comparing a branch deployment's asset graph
//! against its base deployment

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "branchdiff")]
#[command(about = "branchdiff - Asset graph changes between deployments", long_about = None)]
struct Cli {
    /// Config file (default: ./branchdiff.toml when present)
    #[arg(long, global = true, env = "BRANCHDIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Log profile: development or production
    #[arg(long, global = true, env = "BRANCHDIFF_LOG_PROFILE")]
    log_profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff two snapshot files
    Diff(commands::diff::DiffArgs),
    /// Diff a branch deployment against the base deployment by name
    Compare(commands::compare::CompareArgs),
    /// Explain how one asset changed between two snapshot files
    Explain(commands::explain::ExplainArgs),
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let file = config::FileConfig::load(cli.config.as_deref())?;
    let settings = config::Settings::from_file(file)?.with_log_profile(cli.log_profile)?;
    branchdiff_core::logging_facility::init(settings.log_profile);
    tracing::debug!(?settings, "settings resolved");

    match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Compare(args) => commands::compare::execute(args, settings),
        Commands::Explain(args) => commands::explain::execute(args),
    }
}

fn main() {
    // .env values feed the clap `env` fallbacks, so load them before parsing
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
