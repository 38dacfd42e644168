//! Practice session orchestration.
//!
//! A session walks one question at a time through
//! `Reading -> AwaitingAnswer -> Judged`. The host drives the reveal and the
//! prompt; the session judges answers and hands every outcome to the
//! injected [`HistorySink`].

use crate::error::{BeeError, Result};
use crate::matching::{check_answer, MatchResult};
use crate::types::{AnswerStatus, HistoryEntry, PracticeSettings, Question};
use chrono::Utc;
use serde::Serialize;

/// Receives each history entry as it is produced.
pub trait HistorySink {
    fn record(&mut self, entry: &HistoryEntry) -> Result<()>;
}

impl HistorySink for Vec<HistoryEntry> {
    fn record(&mut self, entry: &HistoryEntry) -> Result<()> {
        self.push(entry.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Reading,
    AwaitingAnswer,
    Judged,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::AwaitingAnswer => "awaiting an answer",
            Self::Judged => "judged",
        }
    }
}

/// Outcome of answering or skipping a question.
#[derive(Debug, Clone)]
pub struct Judgement {
    pub entry: HistoryEntry,
    /// `None` for skips.
    pub result: Option<MatchResult>,
}

impl Judgement {
    pub fn status(&self) -> AnswerStatus {
        self.entry.status
    }
}

/// Running totals for the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub attempted: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub skipped: usize,
    /// Answers given before the question finished reading.
    pub early_buzzes: usize,
    /// Correct over answered (skips excluded), 0.0 when nothing answered.
    pub accuracy: f64,
    pub current_streak: usize,
    pub best_streak: usize,
}

pub struct PracticeSession<H> {
    settings: PracticeSettings,
    history_sink: H,
    phase: SessionPhase,
    current: Option<Question>,
    question_set: String,
    buzz_position: Option<usize>,
    history: Vec<HistoryEntry>,
}

impl<H: HistorySink> PracticeSession<H> {
    pub fn new(settings: PracticeSettings, history_sink: H) -> Self {
        Self {
            settings,
            history_sink,
            phase: SessionPhase::Idle,
            current: None,
            question_set: String::new(),
            buzz_position: None,
            history: Vec::new(),
        }
    }

    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PracticeSettings {
        &mut self.settings
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn history_sink(&self) -> &H {
        &self.history_sink
    }

    /// Entries produced during this session, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Put a question in play. The previous one must be judged or skipped.
    pub fn begin(&mut self, question: Question, question_set: impl Into<String>) -> Result<&Question> {
        if matches!(self.phase, SessionPhase::Reading | SessionPhase::AwaitingAnswer) {
            return Err(self.invalid("begin a question"));
        }

        tracing::debug!(question_id = %question.id, "question in play");
        self.question_set = question_set.into();
        self.buzz_position = None;
        self.phase = SessionPhase::Reading;
        Ok(&*self.current.insert(question))
    }

    /// The player buzzed at `position` (raw offset into the question text).
    pub fn buzz(&mut self, position: usize) -> Result<()> {
        self.expect_phase(SessionPhase::Reading, "buzz")?;
        self.buzz_position = Some(position);
        self.phase = SessionPhase::AwaitingAnswer;
        Ok(())
    }

    /// The question was read out in full without a buzz.
    pub fn reveal_finished(&mut self) -> Result<()> {
        self.expect_phase(SessionPhase::Reading, "finish reading")?;
        self.phase = SessionPhase::AwaitingAnswer;
        Ok(())
    }

    /// Judge an answer with the session tolerance and record it.
    ///
    /// A blank answer fails with `InvalidInput` and leaves the question open
    /// so the caller can prompt again.
    pub fn submit_answer(&mut self, answer: &str) -> Result<Judgement> {
        if self.current.is_none() {
            return Err(BeeError::NoQuestionActive);
        }
        self.expect_phase(SessionPhase::AwaitingAnswer, "answer")?;
        if answer.trim().is_empty() {
            return Err(BeeError::InvalidInput("answer must not be blank".to_string()));
        }

        let Some(question) = self.current.as_ref() else {
            return Err(BeeError::NoQuestionActive);
        };
        let result = check_answer(answer, &question.answer_text, self.settings.tolerance_percent);
        let status = if result.is_correct {
            AnswerStatus::Correct
        } else {
            AnswerStatus::Incorrect
        };
        tracing::debug!(
            question_id = %question.id,
            similarity = result.similarity,
            status = status.as_str(),
            "answer judged"
        );

        let entry = self.entry(status, Some(answer.trim().to_string()))?;
        self.finish(entry, Some(result))
    }

    /// Give up on the current question.
    pub fn skip(&mut self) -> Result<Judgement> {
        if self.current.is_none() {
            return Err(BeeError::NoQuestionActive);
        }
        if !matches!(self.phase, SessionPhase::Reading | SessionPhase::AwaitingAnswer) {
            return Err(self.invalid("skip"));
        }

        let entry = self.entry(AnswerStatus::Skipped, None)?;
        self.finish(entry, None)
    }

    pub fn summary(&self) -> SessionSummary {
        let mut summary = SessionSummary {
            attempted: self.history.len(),
            ..SessionSummary::default()
        };

        for entry in &self.history {
            match entry.status {
                AnswerStatus::Correct => {
                    summary.correct += 1;
                    summary.current_streak += 1;
                    summary.best_streak = summary.best_streak.max(summary.current_streak);
                }
                AnswerStatus::Incorrect => {
                    summary.incorrect += 1;
                    summary.current_streak = 0;
                }
                AnswerStatus::Skipped => {
                    summary.skipped += 1;
                    summary.current_streak = 0;
                }
            }
            if entry.buzz_position.is_some() && entry.status != AnswerStatus::Skipped {
                summary.early_buzzes += 1;
            }
        }

        let answered = summary.correct + summary.incorrect;
        if answered > 0 {
            summary.accuracy = summary.correct as f64 / answered as f64;
        }
        summary
    }

    fn entry(&self, status: AnswerStatus, user_answer: Option<String>) -> Result<HistoryEntry> {
        let question = self.current.as_ref().ok_or(BeeError::NoQuestionActive)?;
        Ok(HistoryEntry {
            question_id: question.id.clone(),
            question_text: question.question_text.clone(),
            answer_text: question.answer_text.clone(),
            status,
            timestamp: Utc::now(),
            question_set: self.question_set.clone(),
            user_answer,
            buzz_position: self.buzz_position,
        })
    }

    fn finish(&mut self, entry: HistoryEntry, result: Option<MatchResult>) -> Result<Judgement> {
        self.history_sink.record(&entry)?;
        self.history.push(entry.clone());
        self.phase = SessionPhase::Judged;
        Ok(Judgement { entry, result })
    }

    fn expect_phase(&self, expected: SessionPhase, op: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.invalid(op))
        }
    }

    fn invalid(&self, op: &'static str) -> BeeError {
        BeeError::InvalidTransition {
            op,
            state: self.phase.as_str(),
        }
    }
}
