//! Answer matching for typed answers.
//!
//! Answer fields come straight from the question set, e.g.
//! `<strong>Duke of Wellington</strong> (accept Arthur Wellesley)`. A typed
//! answer is judged against every acceptable candidate pulled out of that
//! field, then against the whole field as a last resort.

use crate::markup::{compile_regex, strip_tags};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

static STRONG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?is)<strong>(.*?)</strong>"));
static ACCEPT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?i)\baccept\b:?\s*([^;)]*)"));
static PUNCTUATION_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"[^\w\s]"));

const STOPWORDS: [&str; 10] = ["the", "a", "an", "of", "or", "and", "in", "on", "at", "to"];

// Absorbs float noise so that e.g. 1 - 2/10 still meets an 80% threshold.
const SIMILARITY_EPSILON: f64 = 1e-9;

/// Which check accepted the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Normalized strings are identical.
    Exact,
    /// One normalized string contains the other.
    Contains,
    /// The answer is close to a run of words inside the candidate.
    NearContains,
    /// Edit-distance similarity met the tolerance.
    Similar,
}

/// Result of judging a typed answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the answer is considered correct.
    pub is_correct: bool,
    /// Best similarity seen between 0.0 and 1.0.
    pub similarity: f64,
    /// Normalized candidate that accepted the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<MatchRule>,
    /// Accepted only by the whole-field comparison.
    pub from_fallback: bool,
    /// Normalized typed answer (for display).
    pub user_normalized: String,
}

/// Pull every acceptable answer out of a marked-up answer field.
///
/// Order is the primary (pre-parenthetical) answer, then `<strong>` spans,
/// then `accept` clauses. Entries that normalize to the same text are kept
/// once, first occurrence wins. A `do not accept` clause is read like any
/// other `accept` clause; the whole-field fallback would match it anyway.
pub fn extract_acceptable_answers(answer_field: &str) -> Vec<String> {
    let mut raw = Vec::new();

    let primary = answer_field.split('(').next().unwrap_or_default();
    raw.push(strip_tags(primary));

    for caps in STRONG_REGEX.captures_iter(answer_field) {
        if let Some(inner) = caps.get(1) {
            raw.push(strip_tags(inner.as_str()));
        }
    }

    for caps in ACCEPT_REGEX.captures_iter(answer_field) {
        if let Some(clause) = caps.get(1) {
            raw.push(strip_tags(clause.as_str()));
        }
    }

    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|candidate| candidate.trim().to_string())
        .filter(|candidate| candidate.chars().count() > 1)
        .filter(|candidate| seen.insert(normalize_answer(candidate)))
        .collect()
}

/// Normalize an answer for comparison.
///
/// Strips markup, lowercases, drops punctuation and stopwords and collapses
/// whitespace. Punctuation goes before stopwords so that the result is a
/// fixed point: `normalize_answer(normalize_answer(s)) == normalize_answer(s)`.
pub fn normalize_answer(text: &str) -> String {
    let lowered = strip_tags(text).to_lowercase();
    let bare = PUNCTUATION_REGEX.replace_all(&lowered, "");
    bare.split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity in [0, 1] from Levenshtein distance over character counts.
///
/// Inputs are compared as given; callers normalize first.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

/// Judge a typed answer against a marked-up answer field.
///
/// `tolerance_percent` above 100 is treated as 100. A typed answer that
/// normalizes to nothing never matches; rejecting blank input is the
/// caller's job.
pub fn check_answer(user_answer: &str, answer_field: &str, tolerance_percent: u8) -> MatchResult {
    let threshold = f64::from(tolerance_percent.min(100)) / 100.0;
    let user_normalized = normalize_answer(user_answer);

    let mut result = MatchResult {
        is_correct: false,
        similarity: 0.0,
        matched: None,
        rule: None,
        from_fallback: false,
        user_normalized,
    };

    if result.user_normalized.is_empty() {
        return result;
    }

    for candidate in extract_acceptable_answers(answer_field) {
        let normalized = normalize_answer(&candidate);
        if let Some(rule) = judge(&result.user_normalized, &normalized, threshold, &mut result.similarity) {
            result.is_correct = true;
            result.rule = Some(rule);
            result.matched = Some(normalized);
            return result;
        }
    }

    // The whole field can still match even after every candidate failed.
    let whole = normalize_answer(answer_field);
    if let Some(rule) = judge(&result.user_normalized, &whole, threshold, &mut result.similarity) {
        result.is_correct = true;
        result.rule = Some(rule);
        result.matched = Some(whole);
        result.from_fallback = true;
    }

    result
}

/// Whether a typed answer is acceptable for an answer field.
pub fn is_correct(user_answer: &str, answer_field: &str, tolerance_percent: u8) -> bool {
    check_answer(user_answer, answer_field, tolerance_percent).is_correct
}

fn judge(user: &str, candidate: &str, threshold: f64, best: &mut f64) -> Option<MatchRule> {
    if candidate.is_empty() {
        return None;
    }
    if user == candidate {
        *best = 1.0;
        return Some(MatchRule::Exact);
    }
    if candidate.contains(user) || user.contains(candidate) {
        *best = best.max(similarity(user, candidate));
        return Some(MatchRule::Contains);
    }

    let whole = similarity(user, candidate);
    *best = best.max(whole);
    if whole + SIMILARITY_EPSILON >= threshold {
        return Some(MatchRule::Similar);
    }

    let window = best_window_similarity(user, candidate);
    *best = best.max(window);
    if window + SIMILARITY_EPSILON >= threshold {
        return Some(MatchRule::NearContains);
    }

    None
}

/// Best similarity between `user` and any run of candidate words of the same
/// length. Zero when the candidate has no more words than the answer.
fn best_window_similarity(user: &str, candidate: &str) -> f64 {
    let size = user.split(' ').count();
    let words: Vec<&str> = candidate.split(' ').collect();
    if words.len() <= size {
        return 0.0;
    }

    words
        .windows(size)
        .map(|window| similarity(user, &window.join(" ")))
        .fold(0.0, f64::max)
}
