//! Drives a reveal from a tokio timer and reader keystrokes.

use bee_core::{Clock, DisplaySink, RevealState, StreamingRevealer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// How often the revealer is polled. Paces below this read at this rate.
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Pace change per `+` / `-` keystroke.
pub const PACE_STEP_MS: u64 = 10;

const MAX_PACE_MS: u64 = 1_000;

/// Clock following tokio time, so paused-time tests control the reveal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Reading speed shared between the reader loop and the revealer.
#[derive(Debug, Clone)]
pub struct Pace(Arc<AtomicU64>);

impl Pace {
    pub fn new(ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(ms.min(MAX_PACE_MS))))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, ms: u64) {
        self.0.store(ms.min(MAX_PACE_MS), Ordering::Relaxed);
    }

    pub fn faster(&self) -> u64 {
        let ms = self.get().saturating_sub(PACE_STEP_MS);
        self.set(ms);
        ms
    }

    pub fn slower(&self) -> u64 {
        let ms = (self.get() + PACE_STEP_MS).min(MAX_PACE_MS);
        self.set(ms);
        ms
    }
}

/// Keys understood while a question is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderCommand {
    Buzz,
    TogglePause,
    Faster,
    Slower,
    Skip,
    Quit,
}

impl ReaderCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" => Some(Self::Buzz),
            "p" | "P" => Some(Self::TogglePause),
            "+" | "=" => Some(Self::Faster),
            "-" | "_" => Some(Self::Slower),
            "s" | "S" => Some(Self::Skip),
            "q" | "Q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// How reading a question ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Read out in full.
    Completed,
    /// Buzzed at this byte offset into the question text.
    Buzzed { position: usize },
    Skipped,
    Quit,
}

/// Reveal `text` until it completes or the reader acts.
///
/// A closed input channel counts as quitting.
pub async fn read_question<S, C>(
    revealer: &mut StreamingRevealer<S, C>,
    text: &str,
    pace: &Pace,
    lines: &mut mpsc::Receiver<String>,
) -> ReadOutcome
where
    S: DisplaySink,
    C: Clock,
{
    let shared = pace.clone();
    revealer.start(text, move || shared.get(), || tracing::trace!("question read in full"));

    let mut interval = tokio::time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                revealer.tick();
                if revealer.state() == RevealState::Completed {
                    return ReadOutcome::Completed;
                }
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    revealer.stop();
                    return ReadOutcome::Quit;
                };
                match ReaderCommand::parse(&line) {
                    Some(ReaderCommand::Buzz) => match revealer.interrupt() {
                        Ok(position) => return ReadOutcome::Buzzed { position },
                        Err(e) => tracing::debug!(error = %e, "buzz ignored"),
                    },
                    Some(ReaderCommand::TogglePause) => {
                        let toggled = if revealer.state() == RevealState::Paused {
                            revealer.resume()
                        } else {
                            revealer.pause()
                        };
                        if let Err(e) = toggled {
                            tracing::debug!(error = %e, "pause toggle ignored");
                        }
                    }
                    Some(ReaderCommand::Faster) => {
                        let ms = pace.faster();
                        tracing::debug!(pace_ms = ms, "reading faster");
                    }
                    Some(ReaderCommand::Slower) => {
                        let ms = pace.slower();
                        tracing::debug!(pace_ms = ms, "reading slower");
                    }
                    Some(ReaderCommand::Skip) => {
                        revealer.stop();
                        return ReadOutcome::Skipped;
                    }
                    Some(ReaderCommand::Quit) => {
                        revealer.stop();
                        return ReadOutcome::Quit;
                    }
                    None => tracing::debug!(input = %line, "unknown reader command"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReaderCommand::parse(""), Some(ReaderCommand::Buzz));
        assert_eq!(ReaderCommand::parse("  "), Some(ReaderCommand::Buzz));
        assert_eq!(ReaderCommand::parse("p"), Some(ReaderCommand::TogglePause));
        assert_eq!(ReaderCommand::parse("+"), Some(ReaderCommand::Faster));
        assert_eq!(ReaderCommand::parse("-"), Some(ReaderCommand::Slower));
        assert_eq!(ReaderCommand::parse("Q"), Some(ReaderCommand::Quit));
        assert_eq!(ReaderCommand::parse("wellington"), None);
    }

    #[test]
    fn test_pace_bounds() {
        let pace = Pace::new(15);
        assert_eq!(pace.faster(), 5);
        assert_eq!(pace.faster(), 0);
        assert_eq!(pace.faster(), 0);
        pace.set(5_000);
        assert_eq!(pace.get(), MAX_PACE_MS);
        assert_eq!(pace.slower(), MAX_PACE_MS);
    }
}
