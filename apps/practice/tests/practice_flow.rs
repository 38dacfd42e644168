//! End-to-end practice runs against an in-memory database.

mod common;

use bee_core::{AnswerStatus, Difficulty, PracticeSession, PracticeSettings, QuestionFilter, SessionPhase};
use history_bee_practice::db::{HistoryRepository, SqliteHistorySink, SqliteRepository, StatsRepository};
use history_bee_practice::driver::{read_question, Pace, ReadOutcome};
use history_bee_practice::picker::QuestionPicker;
use pretty_assertions::assert_eq;

use common::fixtures;

#[tokio::test(start_paused = true)]
async fn test_buzz_answer_and_persist() {
    let repo = SqliteRepository::open_in_memory().unwrap();
    let set = fixtures::question_set();
    let metadata = fixtures::metadata();
    let filter = QuestionFilter {
        region: Some("europe".to_string()),
        time_period: Some("revolutions".to_string()),
    };
    let mut picker = QuestionPicker::new(&set, Difficulty::Preliminary, Some(&metadata), &filter);
    let question = picker.next().unwrap();
    assert_eq!(question.id, "P1");
    assert!(picker.next().is_none());

    let mut session = PracticeSession::new(PracticeSettings::default(), SqliteHistorySink::new(&repo));
    let text = session.begin(question, "fixture").unwrap().question_text.clone();

    let mut revealer = common::revealer();
    let (tx, mut rx) = common::input();
    let _sender = common::script(tx, &[(80, "")]);
    let pace = Pace::new(10);

    let ReadOutcome::Buzzed { position } = read_question(&mut revealer, &text, &pace, &mut rx).await else {
        panic!("expected a buzz");
    };
    session.buzz(position).unwrap();
    assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);

    let judgement = session.submit_answer("Wellingtun").unwrap();
    assert_eq!(judgement.status(), AnswerStatus::Correct);

    let stored = repo.get_question_history("P1").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].entry.buzz_position, Some(position));
    assert_eq!(stored[0].entry.user_answer.as_deref(), Some("Wellingtun"));
    assert_eq!(stored[0].entry.question_set, "fixture");
}

#[tokio::test(start_paused = true)]
async fn test_full_round_with_skip() {
    let repo = SqliteRepository::open_in_memory().unwrap();
    let set = fixtures::question_set();
    let picker = QuestionPicker::new(&set, Difficulty::Preliminary, None, &QuestionFilter::default());
    let mut session = PracticeSession::new(PracticeSettings::default(), SqliteHistorySink::new(&repo));
    let pace = Pace::new(1);

    for question in picker {
        let id = question.id.clone();
        let text = session.begin(question, "fixture").unwrap().question_text.clone();
        let mut revealer = common::revealer();
        let (_tx, mut rx) = common::input();

        assert_eq!(read_question(&mut revealer, &text, &pace, &mut rx).await, ReadOutcome::Completed);
        session.reveal_finished().unwrap();

        if id == "P1" {
            session.submit_answer("Napoleon").unwrap();
        } else {
            session.skip().unwrap();
        }
    }

    let summary = session.summary();
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.incorrect, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.early_buzzes, 0);

    let stats = repo.get_practice_stats(0).unwrap();
    assert_eq!(stats.total_attempted, 2);
    assert_eq!(stats.total_skipped, 1);
    assert_eq!(stats.accuracy, 0.0);
    assert_eq!(repo.get_recent_history(10).unwrap().len(), 2);
}

#[test]
fn test_clean_and_dedup_fixture() {
    let mut set = fixtures::question_set();
    assert_eq!(set.clean_answers(), 1);
    assert_eq!(
        set.get("P2").unwrap().answer_text,
        "<strong>William the Conqueror</strong> (accept William I)"
    );
    assert_eq!(set.remove_duplicates(), 0);
    assert_eq!(set.totals().total, 3);
}
