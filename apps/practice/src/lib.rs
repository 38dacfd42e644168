//! History Bee practice app: terminal reveal loop, SQLite history and
//! question set maintenance on top of `bee-core`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod driver;
pub mod picker;
pub mod terminal;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::db::SqliteRepository;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the reveal on stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().with_overrides(cli.questions, cli.metadata, cli.db);
    tracing::debug!(?config, "configuration loaded");

    // Commands that never touch the database
    match &cli.command {
        Command::Check(args) => return commands::check::run(args),
        Command::Questions { action } => return commands::questions::run(&config.questions_path, action),
        _ => {}
    }

    config
        .prepare_db_dir()
        .with_context(|| format!("failed to create {}", config.db_path.display()))?;
    let repo = SqliteRepository::open(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;

    match &cli.command {
        Command::Play(args) => commands::play::run(&repo, &config, args).await,
        Command::History(args) => commands::history::run(&repo, args),
        Command::Stats(args) => commands::stats::run(&repo, args),
        Command::Settings { action } => commands::settings::run(&repo, action.as_ref()),
        Command::Check(_) | Command::Questions { .. } => Ok(()),
    }
}
