use crate::cli::{SettingsAction, SettingsSetArgs};
use crate::db::{SettingsRepository, SqliteRepository};
use bee_core::{Difficulty, PracticeSettings};

pub fn run(repo: &SqliteRepository, action: Option<&SettingsAction>) -> anyhow::Result<()> {
    match action {
        None | Some(SettingsAction::Show) => show(&repo.get_settings()?),
        Some(SettingsAction::Set(args)) => {
            let updated = apply(repo.get_settings()?, args)?;
            repo.save_settings(&updated)?;
            tracing::info!(?updated, "settings saved");
            show(&updated);
        }
    }
    Ok(())
}

fn apply(mut settings: PracticeSettings, args: &SettingsSetArgs) -> anyhow::Result<PracticeSettings> {
    if let Some(tolerance) = args.tolerance {
        settings.tolerance_percent = tolerance;
    }
    if let Some(speed) = args.speed {
        settings.reading_speed_ms = speed;
    }
    if let Some(difficulty) = &args.difficulty {
        settings.difficulty = Difficulty::parse(difficulty)?;
    }
    if let Some(hour) = args.reset_hour {
        settings.daily_reset_hour = hour;
    }
    Ok(settings)
}

fn show(settings: &PracticeSettings) {
    println!("tolerance:    {}%", settings.tolerance_percent);
    println!("speed:        {} ms/char", settings.reading_speed_ms);
    println!("difficulty:   {}", settings.difficulty);
    println!("reset hour:   {}", settings.daily_reset_hour);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_only_given_fields() {
        let args = SettingsSetArgs {
            tolerance: Some(90),
            speed: None,
            difficulty: Some("F".to_string()),
            reset_hour: None,
        };
        let updated = apply(PracticeSettings::default(), &args).unwrap();
        assert_eq!(
            updated,
            PracticeSettings {
                tolerance_percent: 90,
                difficulty: Difficulty::Finals,
                ..PracticeSettings::default()
            }
        );
    }

    #[test]
    fn test_apply_rejects_unknown_difficulty() {
        let args = SettingsSetArgs {
            tolerance: None,
            speed: None,
            difficulty: Some("championship".to_string()),
            reset_hour: None,
        };
        assert!(apply(PracticeSettings::default(), &args).is_err());
    }
}
