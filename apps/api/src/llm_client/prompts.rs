// Shared prompt fragments and prompt-building utilities.
// Each module that calls the model keeps its own prompts.rs alongside it;
// this file holds the pieces they have in common.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// Appended to prompts whose answer is parsed as a JSON array.
pub const JSON_ARRAY_INSTRUCTION: &str =
    "Respond with the items as a JSON array of strings only. Do not add explanations.";

/// Appended to prompts whose answer is parsed as a JSON object.
pub const JSON_OBJECT_INSTRUCTION: &str =
    "Respond with a single JSON object only. Do not add explanations outside it.";

/// Returns at most `max_chars` leading characters of `text`, never splitting a char.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Fills `{name}` placeholders in one pass over `template`.
///
/// Substituted values are never rescanned, so user text containing `{name}` stays
/// literal. Placeholders without a value are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}
