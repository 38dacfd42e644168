use crate::cli::HistoryArgs;
use crate::db::{HistoryRecord, HistoryRepository, SqliteRepository};
use crate::terminal::render_plain;
use bee_core::AnswerStatus;
use chrono::Local;

pub fn run(repo: &SqliteRepository, args: &HistoryArgs) -> anyhow::Result<()> {
    let records = match &args.question {
        Some(id) => repo.get_question_history(id)?,
        None => repo.get_recent_history(args.limit)?,
    };

    if records.is_empty() {
        println!("No history yet.");
        return Ok(());
    }
    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}

fn format_record(record: &HistoryRecord) -> String {
    let entry = &record.entry;
    let mark = match entry.status {
        AnswerStatus::Correct => "+",
        AnswerStatus::Incorrect => "x",
        AnswerStatus::Skipped => "-",
    };
    let when = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let answer = render_plain(&entry.answer_text);
    match &entry.user_answer {
        Some(given) => format!("{when} {mark} {:<5} {given:?} => {answer}", entry.question_id),
        None => format!("{when} {mark} {:<5} (skipped) => {answer}", entry.question_id),
    }
}
