//! Common test utilities and fixtures for integration tests.
//!
//! Reveal tests run under `#[tokio::test(start_paused = true)]`, so the
//! [`TokioClock`] and the driver's interval both follow virtual time.

#![allow(dead_code)]

pub mod fixtures;

use std::time::Duration;

use bee_core::StreamingRevealer;
use history_bee_practice::driver::TokioClock;
use tokio::sync::mpsc;

pub type TestRevealer = StreamingRevealer<Vec<String>, TokioClock>;

/// Revealer recording every frame it renders.
pub fn revealer() -> TestRevealer {
    StreamingRevealer::with_clock(Vec::new(), TokioClock)
}

/// Reader input channel. Keep the sender alive or the driver sees a quit.
pub fn input() -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
    mpsc::channel(16)
}

/// Send scripted keystrokes, each after its delay from the previous one.
pub fn script(tx: mpsc::Sender<String>, steps: &[(u64, &str)]) -> tokio::task::JoinHandle<mpsc::Sender<String>> {
    let steps: Vec<(u64, String)> = steps.iter().map(|(ms, line)| (*ms, line.to_string())).collect();
    tokio::spawn(async move {
        for (ms, line) in steps {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            if tx.send(line).await.is_err() {
                break;
            }
        }
        tx
    })
}
