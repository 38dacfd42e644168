//! Subcommand handlers.

pub mod check;
pub mod history;
pub mod play;
pub mod questions;
pub mod settings;
pub mod stats;

use anyhow::Context;
use bee_core::{MatchRule, MetadataIndex, QuestionSet};
use std::path::Path;

pub(crate) fn load_question_set(path: &Path) -> anyhow::Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set {}", path.display()))?;
    let set = QuestionSet::from_json(&content)
        .with_context(|| format!("failed to parse question set {}", path.display()))?;
    tracing::info!(path = %path.display(), questions = set.len(), "question set loaded");
    Ok(set)
}

pub(crate) fn load_metadata(path: Option<&Path>) -> anyhow::Result<Option<MetadataIndex>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read metadata {}", path.display()))?;
    let index = MetadataIndex::from_json(&content)
        .with_context(|| format!("failed to parse metadata {}", path.display()))?;
    tracing::info!(path = %path.display(), classified = index.len(), "metadata loaded");
    Ok(Some(index))
}

/// Name recorded with each history entry: the question file's stem.
pub(crate) fn question_set_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "questions".to_string())
}

pub(crate) fn rule_label(rule: MatchRule) -> &'static str {
    match rule {
        MatchRule::Exact => "exact",
        MatchRule::Contains => "contains",
        MatchRule::NearContains => "close to part of the answer",
        MatchRule::Similar => "similar",
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
