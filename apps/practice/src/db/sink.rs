//! Persists session outcomes as they happen.

use crate::db::repository::{HistoryRepository, SqliteRepository};
use bee_core::{BeeError, HistoryEntry, HistorySink};
use uuid::Uuid;

/// History sink writing to the local database under one session id.
pub struct SqliteHistorySink<'a> {
    repo: &'a SqliteRepository,
    session_id: Uuid,
}

impl<'a> SqliteHistorySink<'a> {
    pub fn new(repo: &'a SqliteRepository) -> Self {
        Self {
            repo,
            session_id: Uuid::new_v4(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl HistorySink for SqliteHistorySink<'_> {
    fn record(&mut self, entry: &HistoryEntry) -> bee_core::Result<()> {
        let id = self
            .repo
            .insert_history_entry(self.session_id, entry)
            .map_err(|e| BeeError::History(e.to_string()))?;
        tracing::debug!(row_id = id, question_id = %entry.question_id, "history saved");
        Ok(())
    }
}
