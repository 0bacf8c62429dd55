/*!
 * Figure-description boilerplate stripping.
 *
 * Models preface captions with "Figure 2." or "The diagram shows" even
 * when told not to. The sanitizer strips those openers in a loop until
 * the text stabilizes, then recapitalizes whatever remains.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// "Figure 2." / "Fig. 3:" / "figure 12 -" at the start
static FIGURE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*fig(?:ure)?\.?\s*\d+\s*[.:\-]\s*")
        .unwrap_or_else(|e| panic!("invalid figure-number pattern: {e}"))
});

/// Generic openers such as "The diagram shows" or "This image depicts"
static GENERIC_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:the|this)\s+(?:diagram|image|figure|illustration|chart|graph|photo|photograph)\s+(?:shows|illustrates|depicts|demonstrates|presents|displays)\s*[:,]?\s*",
    )
    .unwrap_or_else(|e| panic!("invalid generic-opener pattern: {e}"))
});

/// A bare leading number left after another strip, "2. " or "3: ".
/// Whitespace (or end of text) must follow the punctuation so ranges
/// like "5-6 hours" survive.
static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+\s*[.:\-](?:\s+|$)")
        .unwrap_or_else(|e| panic!("invalid bare-number pattern: {e}"))
});

/// Detects a leading figure word that survived the numbered form, as in
/// "Figure 2b shows". The boundary keeps real words like "Figures" intact.
static RESIDUAL_FIGURE_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*fig(?:ure)?\b\.?\s*(?:\d+[a-z]*)?\s*[.:\-]?\s*")
        .unwrap_or_else(|e| panic!("invalid residual-figure pattern: {e}"))
});

/// Strip caption boilerplate and recapitalize. Idempotent.
pub fn sanitize(caption: &str) -> String {
    let mut text = caption.trim().to_string();

    // the catch-all runs inside the loop so an opener it uncovers
    // ("Figure 2b The diagram shows ...") is stripped on the next pass
    loop {
        let mut pass = FIGURE_NUMBER.replace(&text, "").into_owned();
        pass = GENERIC_OPENER.replace(&pass, "").into_owned();
        pass = BARE_NUMBER.replace(&pass, "").into_owned();
        pass = RESIDUAL_FIGURE_WORD.replace(&pass, "").into_owned();
        if pass == text {
            break;
        }
        text = pass;
    }

    capitalize_first(text.trim())
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
