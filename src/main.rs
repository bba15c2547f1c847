//! nameseek CLI entry point

use clap::Parser;
use nameseek::cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("NAMESEEK_LOG"))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand(args) => nameseek::cli::expand::run_expand(args).await,
        Commands::Phonetic(args) => nameseek::cli::expand::run_phonetic(args),
        Commands::Terms(args) => nameseek::cli::expand::run_terms(args).await,
        Commands::Index(args) => nameseek::cli::index::run(args).await,
        Commands::Sample(args) => nameseek::cli::sample::run(args).await,
        Commands::Search(args) => nameseek::cli::search::run(args).await,
    }
}
