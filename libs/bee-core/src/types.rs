//! Core types for the History Bee practice tool.

use crate::error::{BeeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Competition round a question was written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Preliminary,
    Quarterfinals,
    Semifinals,
    Finals,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Preliminary
    }
}

impl Difficulty {
    /// All rounds in question-set order.
    pub const ALL: [Difficulty; 4] = [
        Self::Preliminary,
        Self::Quarterfinals,
        Self::Semifinals,
        Self::Finals,
    ];

    /// Single-letter id prefix.
    pub fn code(self) -> char {
        match self {
            Self::Preliminary => 'P',
            Self::Quarterfinals => 'Q',
            Self::Semifinals => 'S',
            Self::Finals => 'F',
        }
    }

    /// Create from an id prefix.
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'P' => Some(Self::Preliminary),
            'Q' => Some(Self::Quarterfinals),
            'S' => Some(Self::Semifinals),
            'F' => Some(Self::Finals),
            _ => None,
        }
    }

    /// Section name used in question set files.
    pub fn key(self) -> &'static str {
        match self {
            Self::Preliminary => "preliminary",
            Self::Quarterfinals => "quarterfinals",
            Self::Semifinals => "semifinals",
            Self::Finals => "finals",
        }
    }

    /// Parse from a section name or a one-letter code.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_code(c).ok_or_else(|| BeeError::UnknownDifficulty(s.to_string()));
        }

        Self::ALL
            .into_iter()
            .find(|d| d.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BeeError::UnknownDifficulty(s.to_string()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parsed `<DifficultyCode><number>` question id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuestionId {
    pub difficulty: Difficulty,
    pub number: u32,
}

impl QuestionId {
    pub fn new(difficulty: Difficulty, number: u32) -> Self {
        Self { difficulty, number }
    }

    pub fn parse(id: &str) -> Result<Self> {
        let invalid = || BeeError::InvalidQuestionId(id.to_string());
        let mut chars = id.chars();
        let difficulty = chars.next().and_then(Difficulty::from_code).ok_or_else(invalid)?;
        let number = chars.as_str().parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { difficulty, number })
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.difficulty.code(), self.number)
    }
}

/// A tossup as loaded from the question set. Never mutated during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question_text: String,
    pub answer_text: String,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        question_text: impl Into<String>,
        answer_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question_text: question_text.into(),
            answer_text: answer_text.into(),
        }
    }

    /// Round derived from the id prefix.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.id.chars().next().and_then(Difficulty::from_code)
    }
}

/// Outcome recorded for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Correct,
    Incorrect,
    Skipped,
}

impl AnswerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::Skipped => "skipped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "correct" => Some(Self::Correct),
            "incorrect" => Some(Self::Incorrect),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

/// One judged (or skipped) question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question_id: String,
    pub question_text: String,
    pub answer_text: String,
    pub status: AnswerStatus,
    pub timestamp: DateTime<Utc>,
    pub question_set: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    /// Raw offset into the question text where the player buzzed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buzz_position: Option<usize>,
}

/// User-tunable practice settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PracticeSettings {
    /// Similarity threshold in percent (0-100).
    pub tolerance_percent: u8,
    /// Delay between revealed characters.
    pub reading_speed_ms: u64,
    pub difficulty: Difficulty,
    pub daily_reset_hour: u32,
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            tolerance_percent: 80,
            reading_speed_ms: 40,
            difficulty: Difficulty::default(),
            daily_reset_hour: 0,
        }
    }
}
