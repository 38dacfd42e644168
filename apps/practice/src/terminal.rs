//! Terminal rendering and line input.

use bee_core::markup::{compile_regex, strip_tags};
use bee_core::reveal::CURSOR_MARKER;
use bee_core::DisplaySink;
use regex::Regex;
use std::io::{self, BufRead, Write};
use std::sync::LazyLock;
use tokio::sync::mpsc;

/// Printed where the reveal stopped on a buzz.
pub const BUZZ_MARKER: &str = " (#)";

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"</?([a-zA-Z]+)[^<>]*>"));

const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const UNDERLINE: &str = "\x1b[4m";
const RESET: &str = "\x1b[0m";

/// Convert the markup used in question sets into ANSI styling.
///
/// Nested styles are not tracked; a closing tag resets all styling.
pub fn render_ansi(text: &str) -> String {
    TAG_REGEX
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let closing = caps[0].starts_with("</");
            if closing {
                return RESET.to_string();
            }
            match caps[1].to_ascii_lowercase().as_str() {
                "b" | "strong" => BOLD.to_string(),
                "i" | "em" => ITALIC.to_string(),
                "u" => UNDERLINE.to_string(),
                _ => String::new(),
            }
        })
        .into_owned()
}

/// Markup removed entirely, for non-interactive output.
pub fn render_plain(text: &str) -> String {
    strip_tags(text)
}

/// Writes reveal frames to a terminal as they grow.
///
/// Frames are cumulative, so only the new suffix is printed. A frame that is
/// not an extension of what was printed (a new reveal) starts a fresh line.
pub struct TerminalSink<W: Write> {
    out: W,
    printed: String,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: String::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Forget what was printed so the next reveal starts clean.
    pub fn reset(&mut self) {
        self.printed.clear();
    }

    /// Print outside of a reveal (prompts, results).
    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", render_ansi(text)).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }

    fn write_delta(&mut self, frame: &str) -> io::Result<()> {
        if !frame.starts_with(self.printed.as_str()) {
            writeln!(self.out)?;
            self.printed.clear();
        }
        let delta = &frame[self.printed.len()..];
        if !delta.is_empty() {
            write!(self.out, "{}", render_ansi(delta))?;
            self.printed.push_str(delta);
        }
        self.out.flush()
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn render(&mut self, text: &str) {
        let frame = text.strip_suffix(CURSOR_MARKER).unwrap_or(text);
        if let Err(e) = self.write_delta(frame) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

/// Forward stdin lines to an async channel.
///
/// Runs on a plain thread since blocking stdin reads would otherwise hold up
/// runtime shutdown. The channel closes on EOF.
pub fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_ansi() {
        assert_eq!(
            render_ansi("The <b>battle</b> of <em>Hastings</em>"),
            "The \x1b[1mbattle\x1b[0m of \x1b[3mHastings\x1b[0m"
        );
        assert_eq!(render_ansi("<span class=\"x\">plain</span>"), "plain\x1b[0m");
    }

    #[test]
    fn test_render_plain() {
        assert_eq!(render_plain("<strong>Duke</strong> of Wellington"), "Duke of Wellington");
    }

    #[test]
    fn test_sink_prints_only_new_text() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.render("");
        sink.render("T▌");
        sink.render("Th▌");
        sink.render("The");
        assert_eq!(String::from_utf8(sink.get_ref().clone()).unwrap(), "The");
    }

    #[test]
    fn test_sink_new_reveal_starts_new_line() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.render("Rome");
        sink.render("");
        sink.render("C▌");
        assert_eq!(String::from_utf8(sink.get_ref().clone()).unwrap(), "Rome\nC");
    }
}
