//! Text normalization for caller messages
//!
//! Collapses whitespace, enforces a length ceiling, and strips control
//! characters before a message enters the pipeline.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DialogosError, Result};

/// Default length ceiling in characters
pub const DEFAULT_MAX_CHARS: usize = 2000;

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove C0 control characters (minus ordinary whitespace) and DEL.
pub fn strip_control_chars(text: &str) -> String {
    static CONTROL_CHARS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());

    CONTROL_CHARS_RE.replace_all(text, "").into_owned()
}

/// Message normalizer with a configurable length ceiling
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    max_chars: usize,
}

impl TextNormalizer {
    /// Create a normalizer with the default ceiling
    pub fn new() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Create a normalizer with a custom ceiling
    pub fn with_max_chars(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Get the length ceiling
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Normalize a raw caller message.
    ///
    /// Whitespace collapse and the length cut happen before control-character
    /// stripping, so the ceiling is measured on pre-strip text. The cut is a
    /// hard one at `max_chars` characters, with no word-boundary awareness.
    ///
    /// # Errors
    ///
    /// Returns [`DialogosError::EmptyInput`] if the text is empty once
    /// normalized. Emptiness is re-checked after stripping, since an input of
    /// only control bytes ends up empty.
    pub fn normalize(&self, raw: &str) -> Result<String> {
        let mut processed = collapse_whitespace(raw);

        if processed.chars().count() > self.max_chars {
            tracing::warn!(limit = self.max_chars, "message truncated to length ceiling");
            processed = processed.chars().take(self.max_chars).collect();
        }

        let processed = strip_control_chars(&processed);

        if processed.trim().is_empty() {
            return Err(DialogosError::EmptyInput);
        }

        Ok(processed)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_runs() {
        let normalizer = TextNormalizer::new();
        let result = normalizer.normalize("Hello    there,    how    are you?").unwrap();
        assert_eq!(result, "Hello there, how are you?");
    }

    #[test]
    fn test_trims_ends() {
        let normalizer = TextNormalizer::new();
        let result = normalizer.normalize("  Hello there  ").unwrap();
        assert_eq!(result, "Hello there");
    }

    #[test]
    fn test_collapses_newlines_and_tabs() {
        let normalizer = TextNormalizer::new();
        let result = normalizer.normalize("line one\n\tline two").unwrap();
        assert_eq!(result, "line one line two");
    }

    #[test]
    fn test_hard_cut_at_ceiling() {
        let normalizer = TextNormalizer::new();
        let result = normalizer.normalize(&"A".repeat(3000)).unwrap();
        assert_eq!(result.chars().count(), 2000);
    }

    #[test]
    fn test_ceiling_counts_characters_not_bytes() {
        let normalizer = TextNormalizer::with_max_chars(4);
        let result = normalizer.normalize("αβγδε").unwrap();
        assert_eq!(result, "αβγδ");
    }

    #[test]
    fn test_strips_control_chars() {
        let normalizer = TextNormalizer::new();
        let result = normalizer.normalize("he\u{0001}llo\u{007F}").unwrap();
        assert_eq!(result, "hello");
    }

    #[test]
    fn test_empty_input_is_error() {
        let normalizer = TextNormalizer::new();
        assert!(matches!(
            normalizer.normalize("   "),
            Err(DialogosError::EmptyInput)
        ));
        assert!(matches!(
            normalizer.normalize(""),
            Err(DialogosError::EmptyInput)
        ));
    }

    #[test]
    fn test_control_only_input_is_error() {
        let normalizer = TextNormalizer::new();
        assert!(matches!(
            normalizer.normalize("\u{0001}\u{0002}\u{0003}"),
            Err(DialogosError::EmptyInput)
        ));
    }

    #[test]
    fn test_idempotent_below_ceiling() {
        let normalizer = TextNormalizer::new();
        let inputs = [
            "  Hello   world  ",
            "already normal",
            "mix\u{0001}ed\t\tcontent here",
        ];
        for input in inputs {
            let once = normalizer.normalize(input).unwrap();
            let twice = normalizer.normalize(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_result_never_exceeds_ceiling() {
        let normalizer = TextNormalizer::new();
        for len in [1999, 2000, 2001, 5000] {
            let result = normalizer.normalize(&"x".repeat(len)).unwrap();
            assert!(result.chars().count() <= 2000);
        }
    }
}
