//! Input validation and sanitization

use crate::error::{ReformError, Result};
use std::fmt;
use std::ops::Deref;

/// Minimum number of characters after trimming
pub const MIN_INPUT_LENGTH: usize = 5;

/// User text that passed validation: trimmed, bounded and HTML-escaped
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedInput(String);

impl ValidatedInput {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for ValidatedInput {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate raw user text against the configured maximum length
///
/// The short check runs on the trimmed text, the long check on the raw
/// text, both counting characters rather than bytes.
pub fn validate(text: &str, max_length: usize) -> Result<ValidatedInput> {
    if text.trim().chars().count() < MIN_INPUT_LENGTH {
        return Err(ReformError::InvalidInput {
            min: MIN_INPUT_LENGTH,
        });
    }
    if text.chars().count() > max_length {
        return Err(ReformError::InputTooLong { max: max_length });
    }
    Ok(ValidatedInput(escape_html(text).trim().to_string()))
}

/// Escape HTML special characters, quotes included
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exactly_five_chars_passes() {
        let input = validate("abcde", 2000).unwrap();
        assert_eq!(input.as_str(), "abcde");
    }

    #[test]
    fn test_short_after_trim_fails() {
        let err = validate("  abcd  \n", 2000).unwrap_err();
        assert!(matches!(err, ReformError::InvalidInput { min: 5 }));
    }

    #[test]
    fn test_too_long_fails() {
        let err = validate(&"a".repeat(11), 10).unwrap_err();
        assert!(matches!(err, ReformError::InputTooLong { max: 10 }));
        assert!(validate(&"a".repeat(10), 10).is_ok());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // 5 two-byte characters
        assert!(validate("äöüßé", 5).is_ok());
    }

    #[test]
    fn test_escapes_and_trims() {
        let input = validate("  <b>Tom & \"Jerry's\"</b>  ", 2000).unwrap();
        assert_eq!(
            input.as_str(),
            "&lt;b&gt;Tom &amp; &quot;Jerry&#x27;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_fix_this_wall() {
        let input = validate("fix this wall", 2000).unwrap();
        assert_eq!(&*input, "fix this wall");
    }

    proptest! {
        #[test]
        fn prop_short_inputs_rejected(s in "\\s{0,3}[a-z]{0,4}\\s{0,3}") {
            prop_assert!(validate(&s, 2000).unwrap_err().is_validation());
        }

        #[test]
        fn prop_valid_inputs_are_trimmed_and_escaped(s in "[a-zA-Z <>&]{5,40}") {
            prop_assume!(s.trim().chars().count() >= 5);
            let out = validate(&s, 2000).unwrap();
            prop_assert_eq!(out.as_str(), out.trim());
            prop_assert!(!out.contains('<'));
            prop_assert!(!out.contains('>'));
        }
    }
}
