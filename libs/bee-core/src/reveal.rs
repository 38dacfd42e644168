//! Timed, markup-aware reveal of question text.
//!
//! The revealer owns no timer. A host calls [`StreamingRevealer::tick`] from
//! whatever repeating timer it has; each tick emits at most one unit once the
//! configured pace has elapsed since the previous emission. A unit is a whole
//! `<...>` tag or a single character, so the cursor never rests inside a tag.

use crate::error::{BeeError, Result};
use crate::markup::next_unit_end;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Appended to the revealed text while a reveal is in progress.
pub const CURSOR_MARKER: &str = "▌";

/// Reveal lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    Revealing,
    Paused,
    /// Every unit was emitted and the completion callback ran.
    Completed,
    /// Halted early by the caller (buzz-in).
    Interrupted,
}

impl RevealState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Revealing => "revealing",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Interrupted)
    }
}

/// Receives the full text to display after every tick.
pub trait DisplaySink {
    fn render(&mut self, text: &str);
}

/// Records every frame; handy for hosts that diff frames themselves.
impl DisplaySink for Vec<String> {
    fn render(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

type PaceFn = Box<dyn Fn() -> u64 + Send>;
type CompletionFn = Box<dyn FnOnce() + Send>;

struct ActiveReveal {
    text: String,
    cursor: usize,
    pace: PaceFn,
    last_emit: Instant,
    on_complete: Option<CompletionFn>,
}

/// Reveals text to a [`DisplaySink`] one unit at a time.
pub struct StreamingRevealer<S, C = SystemClock> {
    sink: S,
    clock: C,
    state: RevealState,
    active: Option<ActiveReveal>,
}

impl<S: DisplaySink> StreamingRevealer<S, SystemClock> {
    pub fn new(sink: S) -> Self {
        Self::with_clock(sink, SystemClock)
    }
}

impl<S: DisplaySink, C: Clock> StreamingRevealer<S, C> {
    pub fn with_clock(sink: S, clock: C) -> Self {
        Self {
            sink,
            clock,
            state: RevealState::Idle,
            active: None,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Raw byte offset of the next unit to emit.
    pub fn cursor(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.cursor)
    }

    /// Text emitted so far, without the cursor marker.
    pub fn revealed(&self) -> &str {
        self.active.as_ref().map_or("", |a| &a.text[..a.cursor])
    }

    /// Full text of the current reveal.
    pub fn text(&self) -> &str {
        self.active.as_ref().map_or("", |a| a.text.as_str())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Begin revealing `text`.
    ///
    /// `pace_ms` is read on every tick, so the caller can change speed
    /// mid-reveal. Any reveal already in progress is dropped together with
    /// its pending completion callback.
    pub fn start<P, F>(&mut self, text: impl Into<String>, pace_ms: P, on_complete: F)
    where
        P: Fn() -> u64 + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        if self.active.is_some() {
            tracing::debug!(state = self.state.as_str(), "restarting reveal");
        }

        let text = text.into();
        tracing::debug!(len = text.len(), "reveal started");
        self.active = Some(ActiveReveal {
            text,
            cursor: 0,
            pace: Box::new(pace_ms),
            last_emit: self.clock.now(),
            on_complete: Some(Box::new(on_complete)),
        });
        self.state = RevealState::Revealing;
        self.sink.render("");
    }

    pub fn pause(&mut self) -> Result<()> {
        self.expect_state(&[RevealState::Revealing], "pause")?;
        self.state = RevealState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.expect_state(&[RevealState::Paused], "resume")?;
        let now = self.clock.now();
        if let Some(active) = self.active.as_mut() {
            active.last_emit = now;
        }
        self.state = RevealState::Revealing;
        Ok(())
    }

    /// Halt for good (buzz-in). Returns the cursor where reveal stopped.
    ///
    /// The completion callback is dropped without running. Marking the stop
    /// point on screen is up to the caller.
    pub fn interrupt(&mut self) -> Result<usize> {
        self.expect_state(&[RevealState::Revealing, RevealState::Paused], "interrupt")?;
        self.state = RevealState::Interrupted;
        let cursor = match self.active.as_mut() {
            Some(active) => {
                active.on_complete = None;
                active.cursor
            }
            None => 0,
        };
        tracing::debug!(cursor, "reveal interrupted");
        Ok(cursor)
    }

    /// Discard any reveal and return to idle. Valid from every state.
    pub fn stop(&mut self) {
        self.active = None;
        self.state = RevealState::Idle;
    }

    /// Advance the reveal if the pace has elapsed.
    ///
    /// Returns the unit emitted by this tick, if any. Ticks outside
    /// `Revealing` do nothing.
    pub fn tick(&mut self) -> Option<&str> {
        if self.state != RevealState::Revealing {
            return None;
        }
        let active = self.active.as_mut()?;

        let now = self.clock.now();
        let pace = Duration::from_millis((active.pace)());
        let start = active.cursor;
        if now.saturating_duration_since(active.last_emit) >= pace {
            active.cursor = next_unit_end(&active.text, start);
            active.last_emit = now;
        }
        let end = active.cursor;

        if end >= active.text.len() {
            self.state = RevealState::Completed;
            self.sink.render(&active.text);
            tracing::debug!("reveal completed");
            if let Some(on_complete) = active.on_complete.take() {
                on_complete();
            }
        } else {
            let mut frame = String::with_capacity(end + CURSOR_MARKER.len());
            frame.push_str(&active.text[..end]);
            frame.push_str(CURSOR_MARKER);
            self.sink.render(&frame);
        }

        if end > start {
            Some(&active.text[start..end])
        } else {
            None
        }
    }

    fn expect_state(&self, allowed: &[RevealState], op: &'static str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(BeeError::InvalidTransition {
                op,
                state: self.state.as_str(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{reveal_units, strip_tags};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;

    const HASTINGS: &str = "The <b>battle</b> of Hastings";

    fn revealer() -> (StreamingRevealer<Vec<String>, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (StreamingRevealer::with_clock(Vec::new(), clock.clone()), clock)
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = count.clone();
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn run_to_end(r: &mut StreamingRevealer<Vec<String>, ManualClock>, clock: &ManualClock, step: u64) -> Vec<String> {
        let mut units = Vec::new();
        for _ in 0..10_000 {
            if r.state().is_terminal() {
                break;
            }
            clock.advance(step);
            if let Some(unit) = r.tick() {
                units.push(unit.to_string());
            }
        }
        units
    }

    #[test]
    fn test_full_reveal_completes_once() {
        let (mut r, clock) = revealer();
        let (count, on_complete) = counter();
        r.start(HASTINGS, || 10, on_complete);
        run_to_end(&mut r, &clock, 10);

        assert_eq!(r.state(), RevealState::Completed);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        let last = r.sink().last().cloned().unwrap_or_default();
        assert_eq!(strip_tags(&last), "The battle of Hastings");
        assert!(!last.contains(CURSOR_MARKER));

        clock.advance(100);
        assert_eq!(r.tick(), None);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_increments_reconstruct_text() {
        let (mut r, clock) = revealer();
        r.start(HASTINGS, || 5, || {});
        let units = run_to_end(&mut r, &clock, 5);
        assert_eq!(units.concat(), HASTINGS);
        assert!(units.contains(&"<b>".to_string()));
    }

    #[test]
    fn test_frames_carry_cursor_while_revealing() {
        let (mut r, clock) = revealer();
        r.start("abc", || 1, || {});
        clock.advance(1);
        r.tick();
        assert_eq!(r.sink().as_slice(), &["".to_string(), format!("a{CURSOR_MARKER}")]);
    }

    #[test]
    fn test_cursor_stays_on_unit_boundaries() {
        let boundaries: Vec<usize> = reveal_units(HASTINGS)
            .iter()
            .scan(0, |acc, unit| {
                *acc += unit.len();
                Some(*acc)
            })
            .collect();

        let (mut r, clock) = revealer();
        r.start(HASTINGS, || 3, || {});
        while !r.state().is_terminal() {
            clock.advance(3);
            r.tick();
            assert!(boundaries.contains(&r.cursor()), "cursor {}", r.cursor());
        }
    }

    #[test]
    fn test_waits_for_pace() {
        let (mut r, clock) = revealer();
        r.start("xy", || 50, || {});
        clock.advance(49);
        assert_eq!(r.tick(), None);
        assert_eq!(r.cursor(), 0);
        clock.advance(1);
        assert_eq!(r.tick(), Some("x"));
    }

    #[test]
    fn test_interrupt_stops_everything() {
        let (mut r, clock) = revealer();
        let (count, on_complete) = counter();
        r.start(HASTINGS, || 10, on_complete);
        for _ in 0..6 {
            clock.advance(10);
            r.tick();
        }
        let at = r.interrupt().unwrap();
        let frames = r.sink().len();

        run_to_end(&mut r, &clock, 10);
        for _ in 0..50 {
            clock.advance(10);
            assert_eq!(r.tick(), None);
        }

        assert_eq!(r.state(), RevealState::Interrupted);
        assert_eq!(r.cursor(), at);
        assert_eq!(r.revealed(), "The <b>b");
        assert_eq!(r.sink().len(), frames);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pause_resume_preserves_content() {
        let (mut plain, clock) = revealer();
        plain.start(HASTINGS, || 10, || {});
        run_to_end(&mut plain, &clock, 10);

        let (mut paused, clock) = revealer();
        paused.start(HASTINGS, || 10, || {});
        clock.advance(10);
        paused.tick();
        paused.pause().unwrap();
        clock.advance(500);
        assert_eq!(paused.tick(), None);
        paused.resume().unwrap();
        run_to_end(&mut paused, &clock, 10);

        assert_eq!(paused.state(), RevealState::Completed);
        assert_eq!(paused.sink().last(), plain.sink().last());
    }

    #[test]
    fn test_live_pace_change() {
        let pace = Arc::new(AtomicU64::new(100));
        let source = pace.clone();
        let (mut r, clock) = revealer();
        r.start("abcdef", move || source.load(Ordering::SeqCst), || {});

        clock.advance(20);
        assert_eq!(r.tick(), None);
        pace.store(10, Ordering::SeqCst);
        assert_eq!(r.tick(), Some("a"));
    }

    #[test]
    fn test_restart_discards_previous_completion() {
        let (mut r, clock) = revealer();
        let (first, on_first) = counter();
        let (second, on_second) = counter();
        r.start("first text", || 1, on_first);
        clock.advance(1);
        r.tick();

        r.start("hi", || 1, on_second);
        assert_eq!(r.cursor(), 0);
        assert_eq!(r.sink().last().map(String::as_str), Some(""));
        run_to_end(&mut r, &clock, 1);

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(r.revealed(), "hi");
    }

    #[test]
    fn test_invalid_transitions() {
        let (mut r, _clock) = revealer();
        assert!(matches!(r.pause(), Err(BeeError::InvalidTransition { op: "pause", .. })));
        assert!(r.resume().is_err());
        assert!(r.interrupt().is_err());

        r.start("abc", || 1, || {});
        assert!(r.resume().is_err());
        r.pause().unwrap();
        assert!(r.pause().is_err());
        r.interrupt().unwrap();
        assert!(r.interrupt().is_err());
    }

    #[test]
    fn test_stop_returns_to_idle() {
        let (mut r, clock) = revealer();
        let (count, on_complete) = counter();
        r.start("abc", || 1, on_complete);
        r.stop();
        clock.advance(10);
        assert_eq!(r.tick(), None);
        assert_eq!(r.state(), RevealState::Idle);
        assert_eq!(r.revealed(), "");
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unterminated_tag_reveals_literally() {
        let (mut r, clock) = revealer();
        r.start("1 < 2", || 1, || {});
        let units = run_to_end(&mut r, &clock, 1);
        assert_eq!(units, vec!["1", " ", "<", " ", "2"]);
        assert_eq!(r.state(), RevealState::Completed);
    }

    #[test]
    fn test_empty_text_completes_on_first_tick() {
        let (mut r, _clock) = revealer();
        let (count, on_complete) = counter();
        r.start("", || 1000, on_complete);
        assert_eq!(r.tick(), None);
        assert_eq!(r.state(), RevealState::Completed);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
