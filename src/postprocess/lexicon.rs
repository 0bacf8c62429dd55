/*!
 * Static unit-abbreviation lexicon and recognizers.
 *
 * The table pairs each abbreviation with its spoken form ("mg/L" becomes
 * "milligrams per liter") so screen readers never have to guess at unit
 * symbols. Matching is token-bounded: an alphanumeric edge of a key must
 * sit on a word boundary, so the key "m" matches "5 m" but never the "m"
 * inside "mass". Symbol edges (°, %, /) carry no boundary requirement.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Abbreviation-to-spoken-form pairs, in lexicon order.
///
/// Both micro glyphs (U+00B5 and U+03BC) appear for each micro unit since
/// model output uses them interchangeably.
pub const UNIT_EXPANSIONS: &[(&str, &str)] = &[
    ("mg/L", "milligrams per liter"),
    ("µg/L", "micrograms per liter"),
    ("μg/L", "micrograms per liter"),
    ("g/L", "grams per liter"),
    ("mol/L", "moles per liter"),
    ("mmol/L", "millimoles per liter"),
    ("M", "molar"),
    ("mM", "millimolar"),
    ("mg", "milligrams"),
    ("g", "grams"),
    ("kg", "kilograms"),
    ("µg", "micrograms"),
    ("μg", "micrograms"),
    ("mL", "milliliters"),
    ("L", "liters"),
    ("cm3", "cubic centimeters"),
    ("cm^3", "cubic centimeters"),
    ("cc", "cubic centimeters"),
    ("kPa", "kilopascals"),
    ("Pa", "pascals"),
    ("atm", "atmospheres"),
    ("bar", "bar"),
    ("J", "joules"),
    ("J/mol", "joules per mole"),
    ("kJ", "kilojoules"),
    ("kJ/mol", "kilojoules per mole"),
    ("µS/cm", "microsiemens per centimeter"),
    ("μS/cm", "microsiemens per centimeter"),
    ("mS/cm", "millisiemens per centimeter"),
    ("S/m", "siemens per meter"),
    ("V", "volts"),
    ("mV", "millivolts"),
    ("A", "amps"),
    ("mA", "milliamps"),
    ("mm", "millimeters"),
    ("cm", "centimeters"),
    ("m", "meters"),
    ("km", "kilometers"),
    ("µm", "micrometers"),
    ("μm", "micrometers"),
    ("nm", "nanometers"),
    ("Å", "angstroms"),
    ("°C", "degrees Celsius"),
    ("C", "degrees Celsius"),
    ("K", "kelvin"),
    ("s", "seconds"),
    ("ms", "milliseconds"),
    ("min", "minutes"),
    ("h", "hours"),
    ("%", "percent"),
    ("ppm", "parts per million"),
    ("ppb", "parts per billion"),
    ("ppt", "parts per trillion"),
    ("N", "newtons"),
    ("W", "watts"),
    ("Hz", "hertz"),
    ("g mol-1", "grams per mole"),
    ("kg m-3", "kilograms per cubic meter"),
    ("kg/m3", "kilograms per cubic meter"),
    ("m s-1", "meters per second"),
    ("m/s", "meters per second"),
];

/// One compiled lexicon entry
#[derive(Debug)]
pub struct LexiconEntry {
    /// The abbreviation as written
    pub key: &'static str,
    /// The spoken form that replaces it
    pub expansion: &'static str,
    /// Token-bounded, case-sensitive matcher for this key
    pub pattern: Regex,
    /// Single alphabetic character keys need surrounding-context checks
    pub single_letter: bool,
}

/// Compiled entries sorted longest key first, so "mg/L" wins over "mg"
/// and "mg" wins over "m".
pub static LEXICON: Lazy<Vec<LexiconEntry>> = Lazy::new(|| {
    let mut entries: Vec<LexiconEntry> = UNIT_EXPANSIONS
        .iter()
        .map(|&(key, expansion)| LexiconEntry {
            key,
            expansion,
            pattern: compile_key(key, false),
            single_letter: key.chars().count() == 1
                && key.chars().all(|c| c.is_alphabetic()),
        })
        .collect();
    entries.sort_by(|a, b| b.key.chars().count().cmp(&a.key.chars().count()));
    entries
});

/// Case-insensitive variants of the multi-character keys, used only for
/// detection. Single-letter keys stay case-sensitive even here: "a" is an
/// article, "A" is amps.
static DETECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    UNIT_EXPANSIONS
        .iter()
        .map(|&(key, _)| compile_key(key, key.chars().count() > 1))
        .collect()
});

/// Letter runs of 1-4 characters touching a unit delimiter, the shape of
/// an abbreviation the lexicon does not know ("qz/ha", "°F").
static SUSPECT_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:[a-zµμ]{1,4}[/^°%-]|[/^°%][a-zµμ]{1,4})")
        .unwrap_or_else(|e| panic!("invalid suspect-shape pattern: {e}"))
});

/// Isolate the full unit-like snippet around a suspect run, for escalation
static SUSPECT_SNIPPET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-zµμ]{1,4}[/^°%][A-Za-z0-9µμ/^°%]{0,8}|[°%][A-Za-zµμ]{1,4}")
        .unwrap_or_else(|e| panic!("invalid suspect-snippet pattern: {e}"))
});

/// Build a token-bounded matcher for a key. A word boundary is required
/// only at edges where the key itself is alphanumeric; symbol edges like
/// "°" or "%" sit next to digits with no boundary between them.
fn compile_key(key: &str, case_insensitive: bool) -> Regex {
    let first_alnum = key.chars().next().is_some_and(|c| c.is_alphanumeric());
    let last_alnum = key.chars().last().is_some_and(|c| c.is_alphanumeric());

    let mut pattern = String::new();
    if case_insensitive {
        pattern.push_str("(?i)");
    }
    if first_alnum {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(key));
    if last_alnum {
        pattern.push_str(r"\b");
    }
    Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid key pattern for {key:?}: {e}"))
}

/// Replace non-breaking spaces so "50 mg/L" pasted from a PDF still matches
pub fn normalize(text: &str) -> String {
    text.replace('\u{00A0}', " ")
}

/// Whether the text contains any lexicon abbreviation as a bounded token.
///
/// Multi-character keys match case-insensitively here since this only
/// gates whether the expander runs at all.
pub fn contains_known_abbreviation(text: &str) -> bool {
    let text = normalize(text);
    DETECTION_PATTERNS.iter().any(|pattern| pattern.is_match(&text))
}

/// Whether the text carries something shaped like a unit the lexicon does
/// not cover. Requires an actual unit delimiter in the text, so ordinary
/// prose with hyphenated words never trips it.
pub fn looks_like_unknown_abbreviation(text: &str) -> bool {
    let text = normalize(text);
    if !text.contains('/') && !text.contains('°') && !text.contains('%') {
        return false;
    }
    if contains_known_abbreviation(&text) {
        return false;
    }
    SUSPECT_SHAPE.is_match(&text)
}

/// Extract the suspect snippet to show the model during escalation
pub fn find_suspect_snippet(text: &str) -> Option<String> {
    let text = normalize(text);
    SUSPECT_SNIPPET.find(&text).map(|m| m.as_str().to_string())
}
