//! Core History Bee practice library.
//!
//! Provides:
//! - Answer matching (candidate extraction, normalization, Levenshtein similarity)
//! - Markup-aware streaming reveal of question text
//! - Practice session orchestration with an injected history sink
//! - Question set and metadata loading plus answer/duplicate cleanup
//! - Shared types (Question, HistoryEntry, PracticeSettings, etc.)

pub mod error;
pub mod markup;
pub mod matching;
pub mod metadata;
pub mod question_set;
pub mod reveal;
pub mod session;
pub mod types;

pub use error::{BeeError, Result};
pub use matching::{
    check_answer, extract_acceptable_answers, is_correct, levenshtein_distance, normalize_answer,
    similarity, MatchResult, MatchRule,
};
pub use metadata::{MetadataIndex, QuestionFilter, QuestionMetadata};
pub use question_set::{DuplicateGroup, QuestionSet, QuestionSetTotals};
pub use reveal::{Clock, DisplaySink, ManualClock, RevealState, StreamingRevealer, SystemClock};
pub use session::{HistorySink, Judgement, PracticeSession, SessionPhase, SessionSummary};
pub use types::{AnswerStatus, Difficulty, HistoryEntry, PracticeSettings, Question, QuestionId};
