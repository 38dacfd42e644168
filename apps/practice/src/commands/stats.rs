use crate::cli::StatsArgs;
use crate::commands::percent;
use crate::db::{SettingsRepository, SqliteRepository, StatsRepository};

pub fn run(repo: &SqliteRepository, args: &StatsArgs) -> anyhow::Result<()> {
    let reset_hour = repo.get_settings()?.daily_reset_hour;
    let stats = repo.get_practice_stats(reset_hour)?;

    println!("Answered:  {} ({} skipped)", stats.total_attempted, stats.total_skipped);
    println!(
        "Correct:   {} / {} ({})",
        stats.total_correct,
        stats.total_correct + stats.total_incorrect,
        percent(stats.accuracy)
    );
    println!("Today:     {} correct of {}", stats.correct_today, stats.attempted_today);
    println!("Streak:    {} day(s)", stats.streak_days);

    println!();
    println!("By round:");
    for round in repo.get_difficulty_stats()? {
        println!(
            "  {:<14} {:>4} answered  {:>6} correct",
            round.difficulty.key(),
            round.attempted,
            percent(round.accuracy)
        );
    }

    if args.days > 0 {
        println!();
        println!("Last {} days:", args.days);
        for day in repo.get_calendar_data(args.days, reset_hour)? {
            println!("  {}  {:>3} / {:<3} {}", day.date, day.correct, day.attempted, "#".repeat(day.attempted.min(40)));
        }
    }
    Ok(())
}
