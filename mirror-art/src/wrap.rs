//! Greedy word wrapping against a measuring function

use crate::canvas::{Canvas, FontSpec};
use crate::error::Result;

/// Break `text` into lines no wider than `max_width`
///
/// Words are separated on whitespace and appended to the current line while
/// the measured width of the candidate line stays within `max_width`. A word
/// that is wider than `max_width` on its own still gets a line to itself.
/// The last line is always emitted, so joining the lines with single spaces
/// reproduces the input word sequence.
///
/// Errors from `measure` abort the wrap.
///
/// ```
/// use mirror_art::wrap_text;
///
/// let lines = wrap_text("aa bb cc", 5.0, |s| Ok(s.len() as f32)).unwrap();
/// assert_eq!(lines, vec!["aa bb", "cc"]);
/// ```
pub fn wrap_text<F>(text: &str, max_width: f32, mut measure: F) -> Result<Vec<String>>
where
    F: FnMut(&str) -> Result<f32>,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if !current.is_empty() && measure(&candidate)? > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    Ok(lines)
}

/// [`wrap_text`] measured by a canvas with `font`
pub fn wrap_on_canvas(
    canvas: &dyn Canvas,
    text: &str,
    max_width: f32,
    font: &FontSpec,
) -> Result<Vec<String>> {
    wrap_text(text, max_width, |s| canvas.measure_text(s, font))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    fn char_width(s: &str) -> Result<f32> {
        Ok(s.chars().count() as f32)
    }

    #[test]
    fn test_greedy_fill() {
        let lines = wrap_text("the quick brown fox jumps", 10.0, char_width).unwrap();
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_exact_fit_stays_on_line() {
        let lines = wrap_text("abc def", 7.0, char_width).unwrap();
        assert_eq!(lines, vec!["abc def"]);
    }

    #[test]
    fn test_oversized_word_gets_own_line() {
        let lines = wrap_text("a extraordinarily b", 5.0, char_width).unwrap();
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(wrap_text("", 100.0, char_width).unwrap().is_empty());
        assert!(wrap_text("   \n\t ", 100.0, char_width).unwrap().is_empty());
    }

    #[test]
    fn test_collapses_runs_of_whitespace() {
        let lines = wrap_text("  one   two\nthree ", 100.0, char_width).unwrap();
        assert_eq!(lines, vec!["one two three"]);
    }

    #[test]
    fn test_measure_error_propagates() {
        let result = wrap_text("one two", 100.0, |_| {
            Err(RenderError::Measure("no font".to_string()))
        });
        assert!(matches!(result, Err(RenderError::Measure(_))));
    }

    #[test]
    fn test_single_word_never_measured() {
        let mut calls = 0;
        let lines = wrap_text("solo", 1.0, |s| {
            calls += 1;
            char_width(s)
        })
        .unwrap();
        assert_eq!(lines, vec!["solo"]);
        assert_eq!(calls, 0);
    }
}
