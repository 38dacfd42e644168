//! Question set files and their maintenance.
//!
//! # Format
//! ```json
//! {
//!   "preliminary": [
//!     { "number": 1, "id": "P1", "question": "...", "answer": "<strong>...</strong>" }
//!   ],
//!   "quarterfinals": [],
//!   "semifinals": [],
//!   "finals": [],
//!   "metadata": { "total_preliminary": 1, "total": 1 }
//! }
//! ```

use crate::error::Result;
use crate::markup::{compile_regex, strip_tags};
use crate::types::{Difficulty, Question, QuestionId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

// Dictation artifacts left at the end of answers by the PDF extraction.
static ANSWER_SUFFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\s*DRAFT\s*Bee\s*PlayoffRound\s*\d+\s*$",
        r"(?i)\s*Bee\s*PlayoffRound\s*\d+\s*$",
        r"(?i)\s*Round\s*\d+\s*<strong>Extra\s*Tossups</strong>\s*$",
        r"(?i)\s*DRAFT\s*$",
        r"(?i)\s*Bee\s*Round\s*\d+\s*$",
        r"(?i)\s*History\s*Bee\s*Round\s*\d+\s*$",
        r"(?i)\s*Extra\s*Tossups?\s*$",
    ]
    .into_iter()
    .map(compile_regex)
    .collect()
});

const METADATA_KEY: &str = "metadata";

type JsonMap = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number: Option<u32>,
    question: String,
    answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(flatten)]
    extra: JsonMap,
}

/// Older extractions wrote singular section names.
fn section_aliases(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Quarterfinals => &["quarterfinal"],
        Difficulty::Semifinals => &["semifinal"],
        _ => &[],
    }
}

/// Per-round question counts, written alongside the questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSetTotals {
    pub total_preliminary: usize,
    pub total_quarterfinals: usize,
    pub total_semifinals: usize,
    pub total_finals: usize,
    pub total: usize,
}

/// Questions sharing the same normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub normalized: String,
    pub ids: Vec<String>,
}

/// All questions of a set, grouped by round, in file order.
///
/// Anything in the file that is not a round section or a question's
/// `number`/`question`/`answer`/`id` (a `championship` section, extra
/// per-question fields, extra `metadata` keys) is kept and written back as is.
#[derive(Debug, Clone, Default)]
pub struct QuestionSet {
    sections: BTreeMap<Difficulty, Vec<Question>>,
    other_keys: JsonMap,
    entry_extra: HashMap<String, JsonMap>,
}

impl QuestionSet {
    /// Parse a question set file. Entries that are not objects are skipped.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut root: JsonMap = serde_json::from_str(content)?;
        let mut set = Self::default();

        for difficulty in Difficulty::ALL {
            let section = std::iter::once(difficulty.key())
                .chain(section_aliases(difficulty).iter().copied())
                .find_map(|key| root.remove(key));
            let entries: Vec<Value> = match section {
                Some(value) => serde_json::from_value(value)?,
                None => Vec::new(),
            };

            let mut questions = Vec::with_capacity(entries.len());
            for (idx, value) in entries.into_iter().enumerate() {
                if !value.is_object() {
                    tracing::warn!(section = difficulty.key(), index = idx, "skipping non-object entry");
                    continue;
                }
                let RawQuestion {
                    number,
                    question,
                    answer,
                    id,
                    extra,
                } = serde_json::from_value(value)?;
                let id = id.unwrap_or_else(|| {
                    let number = number.unwrap_or(idx as u32 + 1);
                    QuestionId::new(difficulty, number).to_string()
                });
                if !extra.is_empty() {
                    set.entry_extra.insert(id.clone(), extra);
                }
                questions.push(Question::new(id, question, answer));
            }
            set.sections.insert(difficulty, questions);
        }

        for key in root.keys().filter(|key| key.as_str() != METADATA_KEY) {
            tracing::debug!(key = %key, "keeping unrecognised section");
        }
        set.other_keys = root;
        Ok(set)
    }

    /// Serialize back to the file format, recomputing totals.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut root = self.other_keys.clone();
        for difficulty in Difficulty::ALL {
            let entries: Vec<RawQuestion> = self
                .questions(difficulty)
                .iter()
                .enumerate()
                .map(|(idx, q)| RawQuestion {
                    number: Some(
                        QuestionId::parse(&q.id).map_or(idx as u32 + 1, |id| id.number),
                    ),
                    question: q.question_text.clone(),
                    answer: q.answer_text.clone(),
                    id: Some(q.id.clone()),
                    extra: self.entry_extra.get(&q.id).cloned().unwrap_or_default(),
                })
                .collect();
            root.insert(difficulty.key().to_string(), serde_json::to_value(entries)?);
        }

        let mut metadata = match root.remove(METADATA_KEY) {
            Some(Value::Object(existing)) => existing,
            _ => JsonMap::new(),
        };
        if let Value::Object(totals) = serde_json::to_value(self.totals())? {
            metadata.extend(totals);
        }
        root.insert(METADATA_KEY.to_string(), Value::Object(metadata));

        Ok(serde_json::to_string_pretty(&Value::Object(root))?)
    }

    /// Top-level keys kept verbatim, such as `championship`.
    pub fn other_sections(&self) -> Vec<&str> {
        self.other_keys
            .keys()
            .map(String::as_str)
            .filter(|key| *key != METADATA_KEY)
            .collect()
    }

    pub fn questions(&self, difficulty: Difficulty) -> &[Question] {
        self.sections.get(&difficulty).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, &Question)> {
        self.sections
            .iter()
            .flat_map(|(difficulty, questions)| questions.iter().map(move |q| (*difficulty, q)))
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.iter().map(|(_, q)| q).find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn totals(&self) -> QuestionSetTotals {
        QuestionSetTotals {
            total_preliminary: self.questions(Difficulty::Preliminary).len(),
            total_quarterfinals: self.questions(Difficulty::Quarterfinals).len(),
            total_semifinals: self.questions(Difficulty::Semifinals).len(),
            total_finals: self.questions(Difficulty::Finals).len(),
            total: self.len(),
        }
    }

    /// Strip trailing artifacts from every answer. Returns how many changed.
    pub fn clean_answers(&mut self) -> usize {
        let mut changes = 0;
        for question in self.sections.values_mut().flatten() {
            let cleaned = clean_answer(&question.answer_text);
            if cleaned != question.answer_text {
                tracing::debug!(question_id = %question.id, "cleaned answer");
                question.answer_text = cleaned;
                changes += 1;
            }
        }
        changes
    }

    /// Groups of questions whose text is the same once normalized, largest first.
    pub fn find_duplicates(&self) -> Vec<DuplicateGroup> {
        let mut order = Vec::new();
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for (_, question) in self.iter() {
            let normalized = normalize_question_text(&question.question_text);
            let ids = groups.entry(normalized.clone()).or_insert_with(|| {
                order.push(normalized);
                Vec::new()
            });
            ids.push(question.id.clone());
        }

        let mut duplicates: Vec<DuplicateGroup> = order
            .into_iter()
            .filter_map(|normalized| {
                let ids = groups.remove(&normalized)?;
                (ids.len() > 1).then_some(DuplicateGroup { normalized, ids })
            })
            .collect();
        duplicates.sort_by(|a, b| b.ids.len().cmp(&a.ids.len()));
        duplicates
    }

    /// Drop repeated questions, keeping the first occurrence in round order.
    /// Returns how many were removed.
    pub fn remove_duplicates(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut removed = 0;
        for (difficulty, questions) in self.sections.iter_mut() {
            let before = questions.len();
            questions.retain(|q| seen.insert(normalize_question_text(&q.question_text)));
            let dropped = before - questions.len();
            if dropped > 0 {
                tracing::info!(section = difficulty.key(), removed = dropped, "removed duplicates");
            }
            removed += dropped;
        }
        removed
    }
}

/// Remove trailing round/draft labels from an answer.
pub fn clean_answer(answer: &str) -> String {
    let mut cleaned = answer.to_string();
    for pattern in ANSWER_SUFFIXES.iter() {
        cleaned = pattern.replace(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Question text reduced for duplicate detection.
pub fn normalize_question_text(text: &str) -> String {
    strip_tags(text)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
