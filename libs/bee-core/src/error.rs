//! Error types for bee-core.

use thiserror::Error;

/// Result type alias using BeeError.
pub type Result<T> = std::result::Result<T, BeeError>;

/// Errors surfaced by the practice core.
#[derive(Debug, Error)]
pub enum BeeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("cannot {op} while {state}")]
    InvalidTransition {
        op: &'static str,
        state: &'static str,
    },

    #[error("no question is in play")]
    NoQuestionActive,

    #[error("invalid question id: {0}")]
    InvalidQuestionId(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("malformed question set: {0}")]
    QuestionSet(String),

    #[error("history sink failed: {0}")]
    History(String),
}

impl From<serde_json::Error> for BeeError {
    fn from(e: serde_json::Error) -> Self {
        Self::QuestionSet(e.to_string())
    }
}
