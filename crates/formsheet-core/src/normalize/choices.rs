//! Mapping free text onto a closed set of labels.

use crate::registry::Choice;

fn tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Find the canonical label for `raw`.
///
/// A whole-value match on a label or alias is preferred; otherwise the first
/// choice whose label or alias appears as a run of words inside the value.
pub fn match_choice<'a>(raw: &str, choices: &'a [Choice]) -> Option<&'a str> {
    let value = tokens(raw);
    if value.is_empty() {
        return None;
    }

    let spellings = |choice: &'a Choice| {
        std::iter::once(choice.label.as_str())
            .chain(choice.aliases.iter().map(String::as_str))
            .map(tokens)
    };

    choices
        .iter()
        .find(|choice| spellings(*choice).any(|s| s == value))
        .or_else(|| {
            choices
                .iter()
                .find(|choice| spellings(*choice).any(|s| contains_run(&value, &s)))
        })
        .map(|choice| choice.label.as_str())
}
