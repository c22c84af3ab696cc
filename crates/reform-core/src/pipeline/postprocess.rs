//! Presentation cleanup for blocking responses

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Longest response returned to the caller, in characters
pub const MAX_RESPONSE_CHARS: usize = 5000;

lazy_static! {
    static ref ORIGINAL_THEN_IMPROVED: Regex =
        Regex::new(r"(?is)(Original:.*?)(\s*)(German\s+)?(Improved:)").expect("valid regex");
}

/// Normalize generated text for display
///
/// Strips bold/emphasis markup, trims lines and drops blank ones, separates
/// an `Improved:` section from a preceding `Original:` one by two blank
/// lines, then truncates.
pub fn postprocess(text: &str) -> String {
    let stripped = text.replace("**", "").replace("__", "");

    let collapsed = stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let separated = ORIGINAL_THEN_IMPROVED.replace_all(&collapsed, |caps: &Captures| {
        // A "German Improved:" heading is not the section being separated
        if caps.get(3).is_some() {
            caps[0].to_string()
        } else {
            format!("{}\n\n\n{}", &caps[1], &caps[4])
        }
    });

    separated.chars().take(MAX_RESPONSE_CHARS).collect()
}
