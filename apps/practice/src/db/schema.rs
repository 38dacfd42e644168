//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local practice database.
pub const SCHEMA: &str = r#"
-- One row per judged or skipped question
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    question_id TEXT NOT NULL,
    question_text TEXT NOT NULL,
    answer_text TEXT NOT NULL,
    question_set TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('correct', 'incorrect', 'skipped')),
    user_answer TEXT,
    buzz_position INTEGER,
    answered_at TEXT NOT NULL
);

-- Practice settings
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    tolerance_percent INTEGER NOT NULL DEFAULT 80,
    reading_speed_ms INTEGER NOT NULL DEFAULT 40,
    difficulty TEXT NOT NULL DEFAULT 'preliminary',
    daily_reset_hour INTEGER NOT NULL DEFAULT 0
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_history_answered ON history(answered_at);
CREATE INDEX IF NOT EXISTS idx_history_question ON history(question_id);
"#;

/// Initialize settings if not exists.
pub const INIT_SETTINGS: &str = r#"
INSERT OR IGNORE INTO settings (id) VALUES (1);
"#;
