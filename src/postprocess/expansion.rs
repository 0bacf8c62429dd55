/*!
 * Unit-abbreviation expansion.
 *
 * Rewrites bounded unit tokens into their spoken forms, longest key
 * first. Single-letter keys ("A", "C", "M") are ambiguous with ordinary
 * prose, so they only expand when the surrounding 20 characters look
 * like a measurement and never near labeling language ("cuvette
 * labeled A" stays as-is).
 */

use crate::postprocess::lexicon::{self, LexiconEntry, LEXICON};

/// Characters of context inspected on each side of a single-letter match
const GUARD_WINDOW: usize = 20;

/// Words that mark a single letter as a label rather than a unit
const LABEL_MARKERS: &[&str] = &["label", "labeled", "labelled", "point", "panel"];

/// Words that mark the surrounding text as a measurement
const MEASUREMENT_MARKERS: &[&str] = &[
    "temperature",
    "concentration",
    "ph",
    "volume",
    "level",
    "solution",
];

/// Expand every bounded lexicon abbreviation in the text.
///
/// Idempotent: running the result through again changes nothing, since no
/// spoken form contains a bounded occurrence of a key.
pub fn expand(text: &str) -> String {
    let mut result = lexicon::normalize(text);
    for entry in LEXICON.iter() {
        result = expand_entry(&result, entry);
    }
    result
}

fn expand_entry(text: &str, entry: &LexiconEntry) -> String {
    let mut result = String::with_capacity(text.len());
    let mut copied_to = 0;

    for found in entry.pattern.find_iter(text) {
        if entry.single_letter && !should_expand_single(text, found.start(), found.end()) {
            continue;
        }
        result.push_str(&text[copied_to..found.start()]);
        if needs_joining_space(text, found.start()) {
            result.push(' ');
        }
        result.push_str(entry.expansion);
        copied_to = found.end();
    }
    result.push_str(&text[copied_to..]);
    result
}

/// "50%" expands to "50 percent", not "50percent": when a symbol-initial
/// key sits flush against an alphanumeric character, insert a space.
fn needs_joining_space(text: &str, match_start: usize) -> bool {
    let starts_with_symbol = text[match_start..]
        .chars()
        .next()
        .is_some_and(|c| !c.is_alphanumeric());
    let follows_alnum = text[..match_start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric());
    starts_with_symbol && follows_alnum
}

/// Decide whether a lone letter is really a unit.
///
/// Checks run in precedence order: label language anywhere in the
/// window suppresses expansion outright, even when a digit sits next to
/// the letter ("in panel 2 A" is a lettered sub-panel, not 2 amps).
/// Only then does a digit neighbor or a measurement word enable it;
/// anything else is left alone, since a wrong skip reads fine while a
/// wrong expansion garbles the sentence. A digit neighbor without any
/// marker word does expand - "measured 2 A" has no other reading the
/// window can see.
fn should_expand_single(text: &str, start: usize, end: usize) -> bool {
    let before: String = text[..start]
        .chars()
        .rev()
        .take(GUARD_WINDOW)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let after: String = text[end..].chars().take(GUARD_WINDOW).collect();
    let window = format!("{}{}{}", before, &text[start..end], after).to_lowercase();

    let has_marker = |markers: &[&str]| {
        window
            .split(|c: char| !c.is_alphabetic())
            .any(|word| markers.contains(&word))
    };

    if has_marker(LABEL_MARKERS) {
        return false;
    }

    let digit_before = before
        .trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit());
    let digit_after = after
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());

    digit_before || digit_after || has_marker(MEASUREMENT_MARKERS)
}
