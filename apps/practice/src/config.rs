//! Environment configuration.

use std::path::{Path, PathBuf};

pub const QUESTIONS_ENV: &str = "HISTORY_BEE_QUESTIONS";
pub const METADATA_ENV: &str = "HISTORY_BEE_METADATA";
pub const DB_ENV: &str = "HISTORY_BEE_DB";

const DEFAULT_QUESTIONS: &str = "questions.json";
const DEFAULT_METADATA: &str = "question_metadata.json";

/// File locations used by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub questions_path: PathBuf,
    /// Classification tags; region/period filters are unavailable without them.
    pub metadata_path: Option<PathBuf>,
    pub db_path: PathBuf,
}

impl AppConfig {
    /// Read paths from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let questions_path = lookup(QUESTIONS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_QUESTIONS));
        let metadata_path = lookup(METADATA_ENV).map(PathBuf::from).or_else(|| {
            let default = PathBuf::from(DEFAULT_METADATA);
            default.exists().then_some(default)
        });
        let db_path = lookup(DB_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        Self {
            questions_path,
            metadata_path,
            db_path,
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        questions: Option<PathBuf>,
        metadata: Option<PathBuf>,
        db: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = questions {
            self.questions_path = path;
        }
        if metadata.is_some() {
            self.metadata_path = metadata;
        }
        if let Some(path) = db {
            self.db_path = path;
        }
        self
    }

    /// Ensure the database directory exists.
    pub fn prepare_db_dir(&self) -> std::io::Result<()> {
        match self.db_path.parent() {
            Some(parent) if parent != Path::new("") => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

fn default_db_path() -> PathBuf {
    // Use the user data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("history-bee")
        .join("history.db")
}
