//! Local SQLite database operations.

pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;
pub mod sink;

pub use error::DbError;
pub use repository::{
    CalendarData, DifficultyStats, HistoryRecord, HistoryRepository, PracticeStats,
    SettingsRepository, SqliteRepository, StatsRepository,
};
pub use sink::SqliteHistorySink;
