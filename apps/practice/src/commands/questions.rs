use crate::cli::QuestionsAction;
use crate::commands::load_question_set;
use anyhow::Context;
use bee_core::question_set::clean_answer;
use bee_core::{Difficulty, QuestionSet};
use std::path::Path;

/// Groups listed in full before the rest are summarized.
const DUPLICATE_PREVIEW: usize = 10;

pub fn run(path: &Path, action: &QuestionsAction) -> anyhow::Result<()> {
    let mut set = load_question_set(path)?;

    match action {
        QuestionsAction::Check => check(&set),
        QuestionsAction::Clean => {
            let changed = set.clean_answers();
            if write_if_changed(path, &set, changed)? {
                println!("Cleaned {changed} answer(s) in {}", path.display());
            } else {
                println!("All answers already clean; {} left untouched", path.display());
            }
        }
        QuestionsAction::Dedup => {
            let removed = set.remove_duplicates();
            if write_if_changed(path, &set, removed)? {
                println!("Removed {removed} duplicate question(s); {} remain", set.len());
            } else {
                println!("No duplicates; {} left untouched", path.display());
            }
        }
    }
    Ok(())
}

fn check(set: &QuestionSet) {
    let totals = set.totals();
    for difficulty in Difficulty::ALL {
        println!("{:<14} {}", difficulty.key(), set.questions(difficulty).len());
    }
    println!("{:<14} {}", "total", totals.total);
    let others = set.other_sections();
    if !others.is_empty() {
        println!("Kept as is:    {}", others.join(", "));
    }

    let unclean = set
        .iter()
        .filter(|(_, q)| clean_answer(&q.answer_text) != q.answer_text)
        .count();
    println!();
    println!("Answers needing cleanup: {unclean}");

    let duplicates = set.find_duplicates();
    println!("Duplicate groups: {}", duplicates.len());
    for group in duplicates.iter().take(DUPLICATE_PREVIEW) {
        println!("  {}: {}", group.ids.join(", "), group.normalized);
    }
    if duplicates.len() > DUPLICATE_PREVIEW {
        println!("  ... and {} more", duplicates.len() - DUPLICATE_PREVIEW);
    }
}

/// Rewrite the file only when something changed. Returns whether it wrote.
fn write_if_changed(path: &Path, set: &QuestionSet, changes: usize) -> anyhow::Result<bool> {
    if changes == 0 {
        tracing::info!(path = %path.display(), "no changes, file not rewritten");
        return Ok(false);
    }
    let json = set.to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), total = set.len(), "question set rewritten");
    Ok(true)
}
