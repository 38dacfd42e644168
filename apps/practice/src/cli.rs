//! Command-line interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DB_ENV, METADATA_ENV, QUESTIONS_ENV};

#[derive(Debug, Parser)]
#[command(name = "history-bee", version, about = "History Bee buzzer practice")]
pub struct Cli {
    /// Question set JSON file.
    #[arg(long, global = true, env = QUESTIONS_ENV)]
    pub questions: Option<PathBuf>,

    /// Question metadata JSON file (enables region/period filters).
    #[arg(long, global = true, env = METADATA_ENV)]
    pub metadata: Option<PathBuf>,

    /// SQLite history database.
    #[arg(long, global = true, env = DB_ENV)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Practice buzzing on questions as they are read out.
    Play(PlayArgs),
    /// Judge a single answer against an answer field.
    Check(CheckArgs),
    /// Show answer history.
    History(HistoryArgs),
    /// Show practice statistics.
    Stats(StatsArgs),
    /// Show or change practice settings.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// Question set maintenance.
    Questions {
        #[command(subcommand)]
        action: QuestionsAction,
    },
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Round to draw from (name or P/Q/S/F); defaults to the saved setting.
    #[arg(long, short)]
    pub difficulty: Option<String>,
    /// Only questions tagged with a region containing this text.
    #[arg(long)]
    pub region: Option<String>,
    /// Only questions tagged with a time period containing this text.
    #[arg(long)]
    pub period: Option<String>,
    /// Stop after this many questions.
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
    /// Reading speed in ms per character.
    #[arg(long)]
    pub speed: Option<u64>,
    /// Similarity threshold in percent.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub tolerance: Option<u8>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    pub answer: String,
    pub answer_field: String,
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub tolerance: u8,
    /// Print the full match result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long, short = 'n', default_value_t = 20)]
    pub limit: usize,
    /// Every attempt at one question instead of the most recent answers.
    #[arg(long)]
    pub question: Option<String>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Calendar length in days.
    #[arg(long, default_value_t = 14)]
    pub days: usize,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Show,
    Set(SettingsSetArgs),
}

#[derive(Debug, Args)]
pub struct SettingsSetArgs {
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub tolerance: Option<u8>,
    #[arg(long)]
    pub speed: Option<u64>,
    #[arg(long)]
    pub difficulty: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    pub reset_hour: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum QuestionsAction {
    /// Report counts, unclean answers and duplicates without writing.
    Check,
    /// Strip trailing round labels from answers and rewrite the file.
    Clean,
    /// Remove repeated questions and rewrite the file.
    Dedup,
}
