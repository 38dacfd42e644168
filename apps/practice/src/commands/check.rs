use crate::cli::CheckArgs;
use crate::commands::{percent, rule_label};
use crate::terminal::render_plain;
use bee_core::{check_answer, extract_acceptable_answers};

pub fn run(args: &CheckArgs) -> anyhow::Result<()> {
    let result = check_answer(&args.answer, &args.answer_field, args.tolerance);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let candidates = extract_acceptable_answers(&args.answer_field);
    println!("Acceptable answers:");
    for candidate in &candidates {
        println!("  - {}", render_plain(candidate));
    }
    if candidates.is_empty() {
        println!("  (none; judging against the whole field)");
    }

    let verdict = if result.is_correct { "CORRECT" } else { "INCORRECT" };
    println!("{verdict} (similarity {}, tolerance {}%)", percent(result.similarity), args.tolerance);
    if let (Some(matched), Some(rule)) = (&result.matched, result.rule) {
        println!("Matched \"{}\" by {}", render_plain(matched), rule_label(rule));
    }
    if result.from_fallback {
        println!("Note: matched against the whole answer field");
    }
    Ok(())
}
