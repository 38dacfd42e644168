//! Inline markup helpers shared by matching and reveal.
//!
//! Question and answer text carry a small tag vocabulary (`<strong>`, `<em>`,
//! `<b>`, `<i>`, `<u>`). Nothing here validates tags; anything shaped like
//! `<...>` is treated as markup.

use regex::Regex;
use std::sync::LazyLock;

/// Compile a hardcoded pattern, degrading to a never-matching regex.
pub fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(fallback) => fallback,
            Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
        },
    }
}

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"<[^<>]*>"));

/// Remove every `<...>` tag, keeping the text between them.
pub fn strip_tags(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").into_owned()
}

/// Byte offset just past the reveal unit that starts at `cursor`.
///
/// A unit is a whole `<...>` tag when one starts at `cursor` and is closed
/// before any other `<`, otherwise a single character. An unterminated `<`
/// is a plain character.
/// Returns `cursor` unchanged when it is at or past the end of `text`.
pub fn next_unit_end(text: &str, cursor: usize) -> usize {
    let Some(rest) = text.get(cursor..) else {
        return cursor;
    };
    let mut chars = rest.chars();
    match chars.next() {
        None => cursor,
        Some('<') => {
            let tail = chars.as_str();
            match tail.find(['<', '>']) {
                Some(idx) if tail[idx..].starts_with('>') => cursor + idx + 2,
                _ => cursor + 1,
            }
        }
        Some(c) => cursor + c.len_utf8(),
    }
}

/// Split text into reveal units, in order.
pub fn reveal_units(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut cursor = 0;
    while cursor < text.len() {
        let end = next_unit_end(text, cursor);
        units.push(&text[cursor..end]);
        cursor = end;
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<strong>Duke</strong> of <em>Wellington</em>"), "Duke of Wellington");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags("a < b"), "a < b");
    }

    #[test]
    fn test_tag_is_one_unit() {
        let text = "The <b>battle</b>";
        assert_eq!(
            reveal_units(text),
            vec!["T", "h", "e", " ", "<b>", "b", "a", "t", "t", "l", "e", "</b>"]
        );
    }

    #[test]
    fn test_unterminated_tag_is_literal() {
        assert_eq!(reveal_units("a<b"), vec!["a", "<", "b"]);
        assert_eq!(next_unit_end("<", 0), 1);
    }

    #[test]
    fn test_stray_lt_before_a_tag_is_literal() {
        let text = "a < b <i>c</i>";
        assert_eq!(
            reveal_units(text),
            vec!["a", " ", "<", " ", "b", " ", "<i>", "c", "</i>"]
        );
        assert_eq!(strip_tags(text), "a < b c");
        assert_eq!(strip_tags("x <y <b>z</b>"), "x <y z");
    }

    #[test]
    fn test_multibyte_characters() {
        let text = "Ségur";
        assert_eq!(reveal_units(text), vec!["S", "é", "g", "u", "r"]);
        assert_eq!(reveal_units(text).concat(), text);
    }

    #[test]
    fn test_cursor_at_end() {
        assert_eq!(next_unit_end("abc", 3), 3);
        assert_eq!(next_unit_end("abc", 10), 10);
    }
}
