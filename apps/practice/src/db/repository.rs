//! Repository pattern for database access.

use crate::db::date_utils::{format_day, get_adjusted_today, reset_hour_modifier};
use crate::db::error::DbError;
use bee_core::{AnswerStatus, Difficulty, HistoryEntry, PracticeSettings};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for answer history.
pub trait HistoryRepository {
    fn insert_history_entry(&self, session_id: Uuid, entry: &HistoryEntry) -> Result<i64>;
    fn get_recent_history(&self, limit: usize) -> Result<Vec<HistoryRecord>>;
    fn get_question_history(&self, question_id: &str) -> Result<Vec<HistoryRecord>>;
}

/// Repository for settings operations.
pub trait SettingsRepository {
    fn get_settings(&self) -> Result<PracticeSettings>;
    fn save_settings(&self, settings: &PracticeSettings) -> Result<()>;
}

/// Repository for statistics.
pub trait StatsRepository {
    fn get_practice_stats(&self, daily_reset_hour: u32) -> Result<PracticeStats>;
    fn get_difficulty_stats(&self) -> Result<Vec<DifficultyStats>>;
    fn get_calendar_data(&self, days: usize, daily_reset_hour: u32) -> Result<Vec<CalendarData>>;
}

/// Stored history row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub session_id: String,
    #[serde(flatten)]
    pub entry: HistoryEntry,
}

/// Overall practice statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PracticeStats {
    pub total_attempted: usize,
    pub total_correct: usize,
    pub total_incorrect: usize,
    pub total_skipped: usize,
    /// Correct over answered, skips excluded.
    pub accuracy: f64,
    pub attempted_today: usize,
    pub correct_today: usize,
    pub streak_days: usize,
}

/// Per-round breakdown.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DifficultyStats {
    pub difficulty: Difficulty,
    pub attempted: usize,
    pub correct: usize,
    pub accuracy: f64,
}

/// Calendar data point.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CalendarData {
    pub date: String,
    pub attempted: usize,
    pub correct: usize,
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SETTINGS)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Day bucket expression for `answered_at`, shifted by the reset hour.
    const DAY_EXPR: &'static str = "date(answered_at, 'localtime', ?1)";

    fn count_on_day(&self, day: &str, daily_reset_hour: u32, status: Option<AnswerStatus>) -> Result<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM history WHERE {} = ?2 AND (?3 IS NULL OR status = ?3)",
            Self::DAY_EXPR
        );
        let count: i64 = self.conn.query_row(
            &sql,
            params![reset_hour_modifier(daily_reset_hour), day, status.map(|s| s.as_str())],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn count_status(&self, status: AnswerStatus) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM history WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

const HISTORY_COLUMNS: &str = "id, session_id, question_id, question_text, answer_text, question_set,
     status, user_answer, buzz_position, answered_at";

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
    let status_str: String = row.get(6)?;
    let status = AnswerStatus::from_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            format!("unknown status: {status_str}").into(),
        )
    })?;
    let answered_at: String = row.get(9)?;
    let timestamp = DateTime::parse_from_rfc3339(&answered_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let buzz_position: Option<i64> = row.get(8)?;

    Ok(HistoryRecord {
        id: row.get(0)?,
        session_id: row.get(1)?,
        entry: HistoryEntry {
            question_id: row.get(2)?,
            question_text: row.get(3)?,
            answer_text: row.get(4)?,
            question_set: row.get(5)?,
            status,
            user_answer: row.get(7)?,
            buzz_position: buzz_position.map(|p| p as usize),
            timestamp,
        },
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl HistoryRepository for SqliteRepository {
    fn insert_history_entry(&self, session_id: Uuid, entry: &HistoryEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO history (session_id, question_id, question_text, answer_text, question_set,
                                  status, user_answer, buzz_position, answered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                session_id.to_string(),
                entry.question_id,
                entry.question_text,
                entry.answer_text,
                entry.question_set,
                entry.status.as_str(),
                entry.user_answer,
                entry.buzz_position.map(|p| p as i64),
                entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_recent_history(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HISTORY_COLUMNS} FROM history ORDER BY answered_at DESC, id DESC LIMIT ?1"
        ))?;
        let records = stmt
            .query_map(params![limit as i64], history_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn get_question_history(&self, question_id: &str) -> Result<Vec<HistoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HISTORY_COLUMNS} FROM history WHERE question_id = ?1 ORDER BY answered_at, id"
        ))?;
        let records = stmt
            .query_map(params![question_id], history_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl SettingsRepository for SqliteRepository {
    fn get_settings(&self) -> Result<PracticeSettings> {
        let settings = self
            .conn
            .query_row(
                "SELECT tolerance_percent, reading_speed_ms, difficulty, daily_reset_hour FROM settings WHERE id = 1",
                [],
                |row| {
                    let difficulty_str: String = row.get(2)?;
                    let tolerance: i64 = row.get(0)?;
                    let speed: i64 = row.get(1)?;

                    Ok(PracticeSettings {
                        tolerance_percent: tolerance.clamp(0, 100) as u8,
                        reading_speed_ms: speed.max(0) as u64,
                        difficulty: Difficulty::parse(&difficulty_str).unwrap_or_default(),
                        daily_reset_hour: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(settings.unwrap_or_default())
    }

    fn save_settings(&self, settings: &PracticeSettings) -> Result<()> {
        if settings.tolerance_percent > 100 {
            return Err(DbError::InvalidData(format!(
                "tolerance must be 0-100, got {}",
                settings.tolerance_percent
            )));
        }
        if settings.daily_reset_hour > 23 {
            return Err(DbError::InvalidData(format!(
                "daily reset hour must be 0-23, got {}",
                settings.daily_reset_hour
            )));
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO settings (id, tolerance_percent, reading_speed_ms, difficulty, daily_reset_hour)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                settings.tolerance_percent,
                settings.reading_speed_ms as i64,
                settings.difficulty.key(),
                settings.daily_reset_hour,
            ],
        )?;
        Ok(())
    }
}

impl StatsRepository for SqliteRepository {
    fn get_practice_stats(&self, daily_reset_hour: u32) -> Result<PracticeStats> {
        let today_date = get_adjusted_today(daily_reset_hour);
        let today = format_day(today_date);

        let total_correct = self.count_status(AnswerStatus::Correct)?;
        let total_incorrect = self.count_status(AnswerStatus::Incorrect)?;
        let total_skipped = self.count_status(AnswerStatus::Skipped)?;

        let attempted_today = self.count_on_day(&today, daily_reset_hour, None)?;
        let correct_today = self.count_on_day(&today, daily_reset_hour, Some(AnswerStatus::Correct))?;

        // Consecutive practice days, allowing today to be empty so far
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {} FROM history",
            Self::DAY_EXPR
        ))?;
        let days: HashSet<String> = stmt
            .query_map(params![reset_hour_modifier(daily_reset_hour)], |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;

        let mut streak_days = 0usize;
        let mut current_date = today_date;
        if !days.contains(&today) {
            current_date = current_date.pred_opt().unwrap_or(current_date);
        }
        while days.contains(&format_day(current_date)) {
            streak_days += 1;
            match current_date.pred_opt() {
                Some(prev) => current_date = prev,
                None => break,
            }
        }

        Ok(PracticeStats {
            total_attempted: total_correct + total_incorrect + total_skipped,
            total_correct,
            total_incorrect,
            total_skipped,
            accuracy: ratio(total_correct, total_correct + total_incorrect),
            attempted_today,
            correct_today,
            streak_days,
        })
    }

    fn get_difficulty_stats(&self) -> Result<Vec<DifficultyStats>> {
        let mut stats = Vec::with_capacity(Difficulty::ALL.len());
        for difficulty in Difficulty::ALL {
            let prefix = format!("{}%", difficulty.code());
            let (attempted, correct, incorrect): (i64, i64, i64) = self.conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(CASE WHEN status = 'correct' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN status = 'incorrect' THEN 1 ELSE 0 END), 0)
                 FROM history WHERE question_id LIKE ?1",
                params![prefix],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;

            stats.push(DifficultyStats {
                difficulty,
                attempted: attempted as usize,
                correct: correct as usize,
                accuracy: ratio(correct as usize, (correct + incorrect) as usize),
            });
        }
        Ok(stats)
    }

    fn get_calendar_data(&self, days: usize, daily_reset_hour: u32) -> Result<Vec<CalendarData>> {
        let mut data = Vec::with_capacity(days);
        let today = get_adjusted_today(daily_reset_hour);

        for i in 0..days {
            let date = today - chrono::Duration::days(i as i64);
            let date_str = format_day(date);

            let attempted = self.count_on_day(&date_str, daily_reset_hour, None)?;
            let correct = self.count_on_day(&date_str, daily_reset_hour, Some(AnswerStatus::Correct))?;

            data.push(CalendarData {
                date: date_str,
                attempted,
                correct,
            });
        }

        // Oldest first
        data.reverse();
        Ok(data)
    }
}
