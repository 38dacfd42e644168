//! Interactive buzzer practice.

use crate::cli::PlayArgs;
use crate::commands::{load_metadata, load_question_set, percent, question_set_name, rule_label};
use crate::config::AppConfig;
use crate::db::{SettingsRepository, SqliteHistorySink, SqliteRepository};
use crate::driver::{read_question, Pace, ReadOutcome, TokioClock};
use crate::picker::QuestionPicker;
use crate::terminal::{spawn_line_reader, TerminalSink, BUZZ_MARKER};
use bee_core::{
    BeeError, Difficulty, HistorySink, Judgement, PracticeSession, PracticeSettings,
    QuestionFilter, SessionSummary, StreamingRevealer,
};
use std::io::Write;
use tokio::sync::mpsc;

const SKIP_COMMAND: &str = "/skip";

const HELP: &str = "Enter = buzz   p = pause/resume   + / - = faster/slower   s = skip   q = quit";

pub async fn run(repo: &SqliteRepository, config: &AppConfig, args: &PlayArgs) -> anyhow::Result<()> {
    let stored = repo.get_settings()?;
    let settings = session_settings(&stored, args)?;

    let set = load_question_set(&config.questions_path)?;
    let metadata = load_metadata(config.metadata_path.as_deref())?;
    let filter = QuestionFilter {
        region: args.region.clone(),
        time_period: args.period.clone(),
    };
    if !filter.is_empty() && metadata.is_none() {
        anyhow::bail!("region/period filters need a metadata file (--metadata)");
    }

    let picker = QuestionPicker::new(&set, settings.difficulty, metadata.as_ref(), &filter);
    if picker.is_empty() {
        println!("No {} questions match.", settings.difficulty);
        return Ok(());
    }
    let count = args.count.unwrap_or(picker.remaining());

    let pace = Pace::new(settings.reading_speed_ms);
    let set_name = question_set_name(&config.questions_path);
    let mut session = PracticeSession::new(settings.clone(), SqliteHistorySink::new(repo));
    let mut revealer = StreamingRevealer::with_clock(TerminalSink::stdout(), TokioClock);
    let mut lines = spawn_line_reader();

    tracing::info!(
        difficulty = settings.difficulty.key(),
        pool = picker.remaining(),
        count,
        "practice started"
    );
    revealer.sink_mut().line(HELP);

    'questions: for (number, question) in picker.take(count).enumerate() {
        revealer.sink_mut().reset();
        revealer
            .sink_mut()
            .line(&format!("\n<b>Question {} ({})</b>", number + 1, question.id));
        let text = session.begin(question, set_name.as_str())?.question_text.clone();

        match read_question(&mut revealer, &text, &pace, &mut lines).await {
            ReadOutcome::Completed => {
                revealer.sink_mut().line("");
                session.reveal_finished()?;
            }
            ReadOutcome::Buzzed { position } => {
                revealer.sink_mut().line(BUZZ_MARKER);
                session.buzz(position)?;
            }
            ReadOutcome::Skipped => {
                revealer.sink_mut().line("");
                let judgement = session.skip()?;
                show_judgement(revealer.sink_mut(), &judgement);
                continue;
            }
            ReadOutcome::Quit => {
                revealer.sink_mut().line("");
                break;
            }
        }

        let Some(judgement) = prompt_answer(&mut session, revealer.sink_mut(), &mut lines).await? else {
            break 'questions;
        };
        show_judgement(revealer.sink_mut(), &judgement);
    }

    show_summary(revealer.sink_mut(), &session.summary());

    if pace.get() != settings.reading_speed_ms {
        let updated = PracticeSettings {
            reading_speed_ms: pace.get(),
            ..stored
        };
        repo.save_settings(&updated)?;
        tracing::info!(pace_ms = updated.reading_speed_ms, "reading speed saved");
    }
    Ok(())
}

/// Stored settings with this run's command-line overrides.
fn session_settings(stored: &PracticeSettings, args: &PlayArgs) -> anyhow::Result<PracticeSettings> {
    let mut settings = stored.clone();
    if let Some(difficulty) = &args.difficulty {
        settings.difficulty = Difficulty::parse(difficulty)?;
    }
    if let Some(speed) = args.speed {
        settings.reading_speed_ms = speed;
    }
    if let Some(tolerance) = args.tolerance {
        settings.tolerance_percent = tolerance;
    }
    Ok(settings)
}

/// Ask until a non-blank answer or `/skip` arrives. `None` when input closed.
async fn prompt_answer<H: HistorySink, W: Write>(
    session: &mut PracticeSession<H>,
    out: &mut TerminalSink<W>,
    lines: &mut mpsc::Receiver<String>,
) -> anyhow::Result<Option<Judgement>> {
    loop {
        out.line(&format!("Your answer ({SKIP_COMMAND} to give up):"));
        let Some(line) = lines.recv().await else {
            return Ok(None);
        };
        if line.trim() == SKIP_COMMAND {
            return Ok(Some(session.skip()?));
        }
        match session.submit_answer(&line) {
            Ok(judgement) => return Ok(Some(judgement)),
            Err(BeeError::InvalidInput(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

fn show_judgement<W: Write>(out: &mut TerminalSink<W>, judgement: &Judgement) {
    let verdict = match &judgement.result {
        None => "Skipped.".to_string(),
        Some(result) if result.is_correct => match result.rule {
            Some(rule) => format!("<b>Correct!</b> ({})", rule_label(rule)),
            None => "<b>Correct!</b>".to_string(),
        },
        Some(result) => format!("<b>Incorrect.</b> (similarity {})", percent(result.similarity)),
    };
    out.line(&verdict);
    out.line(&format!("Answer: {}", judgement.entry.answer_text));
}

fn show_summary<W: Write>(out: &mut TerminalSink<W>, summary: &SessionSummary) {
    out.line("");
    out.line(&format!(
        "<b>Session:</b> {} correct, {} incorrect, {} skipped ({} accuracy)",
        summary.correct,
        summary.incorrect,
        summary.skipped,
        percent(summary.accuracy)
    ));
    out.line(&format!(
        "Early buzzes: {}   best streak: {}",
        summary.early_buzzes, summary.best_streak
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args() -> PlayArgs {
        PlayArgs {
            difficulty: None,
            region: None,
            period: None,
            count: None,
            speed: None,
            tolerance: None,
        }
    }

    #[test]
    fn test_session_settings_overrides() {
        let stored = PracticeSettings::default();
        assert_eq!(session_settings(&stored, &args()).unwrap(), stored);

        let overridden = session_settings(
            &stored,
            &PlayArgs {
                difficulty: Some("semifinals".to_string()),
                speed: Some(10),
                tolerance: Some(95),
                ..args()
            },
        )
        .unwrap();
        assert_eq!(overridden.difficulty, Difficulty::Semifinals);
        assert_eq!(overridden.reading_speed_ms, 10);
        assert_eq!(overridden.tolerance_percent, 95);
    }

    #[tokio::test]
    async fn test_prompt_reprompts_on_blank() {
        let mut session = PracticeSession::new(PracticeSettings::default(), Vec::new());
        session
            .begin(
                bee_core::Question::new("P1", "Waterloo victor", "<strong>Wellington</strong>"),
                "test",
            )
            .unwrap();
        session.reveal_finished().unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        tx.send("   ".to_string()).await.unwrap();
        tx.send("wellington".to_string()).await.unwrap();
        let mut out = TerminalSink::new(Vec::new());

        let judgement = prompt_answer(&mut session, &mut out, &mut rx).await.unwrap().unwrap();
        assert_eq!(judgement.status(), bee_core::AnswerStatus::Correct);
        let printed = String::from_utf8(out.get_ref().clone()).unwrap();
        assert_eq!(printed.matches("Your answer").count(), 2);
    }

    #[tokio::test]
    async fn test_prompt_skip_and_closed_input() {
        let mut session = PracticeSession::new(PracticeSettings::default(), Vec::new());
        session
            .begin(bee_core::Question::new("P2", "Hastings", "William"), "test")
            .unwrap();
        session.buzz(3).unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        tx.send(SKIP_COMMAND.to_string()).await.unwrap();
        let mut out = TerminalSink::new(Vec::new());
        let judgement = prompt_answer(&mut session, &mut out, &mut rx).await.unwrap().unwrap();
        assert_eq!(judgement.status(), bee_core::AnswerStatus::Skipped);

        drop(tx);
        session.begin(bee_core::Question::new("P3", "Actium", "Octavian"), "test").unwrap();
        session.reveal_finished().unwrap();
        assert!(prompt_answer(&mut session, &mut out, &mut rx).await.unwrap().is_none());
    }
}
