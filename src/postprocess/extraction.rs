/*!
 * Section extraction from model responses.
 *
 * Full-mode responses carry four labeled sections in loosely formatted
 * markdown. The extractor scans for every heading first, then slices the
 * text between consecutive headings, so formatting noise around a label
 * (numbering, bold markers, character-count qualifiers) never bleeds into
 * the content. Structured-output responses skip all of this and
 * deserialize directly, falling back to the scanner when the JSON is
 * malformed.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::sections::{AccessibilitySections, GenerationMode};

/// Accepts the heading shapes the model actually produces:
///   "1. **Alt Text** (120 characters max):"
///   "**Figure Description**:"
///   "Alt Text (Character Count: 62):"
///   "Long Description"
static SECTION_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)^[ \t]*(?:\d+\.[ \t]*)?\*{0,2}[ \t]*(Alt Text|Figure Description|Long Description|Transcribed Text)[ \t]*(?:\([^)\n]*\))?[ \t]*\*{0,2}[ \t]*(?:\([^)\n]*\))?[ \t]*:?[ \t]*",
    )
    .unwrap_or_else(|e| panic!("invalid section-heading pattern: {e}"))
});

/// Shape of a structured-output response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredSections {
    alt_text: Option<String>,
    figure_description: Option<String>,
    long_description: Option<String>,
    transcribed_text: Option<String>,
}

/// Parse a raw model response into sections.
///
/// In single-field modes the entire response is the field. In full mode
/// every section is sliced between its heading and the next; a missing
/// alt text falls back to the first `alt_budget` characters of the raw
/// response, and a missing long description falls back to the whole of
/// it, so neither required field is ever empty.
pub fn extract(raw: &str, mode: GenerationMode, alt_budget: usize) -> AccessibilitySections {
    let mut sections = AccessibilitySections::default();
    let trimmed = raw.trim();

    match mode {
        GenerationMode::AltTextOnly => {
            sections.alt_text = Some(single_field(trimmed, "Alt Text"));
            return sections;
        }
        GenerationMode::LongDescriptionOnly => {
            sections.long_description = Some(single_field(trimmed, "Long Description"));
            return sections;
        }
        GenerationMode::Full => {}
    }

    for (label, content) in scan_sections(raw) {
        let slot = match label {
            "alt text" => &mut sections.alt_text,
            "figure description" => &mut sections.figure_description,
            "long description" => &mut sections.long_description,
            "transcribed text" => &mut sections.transcribed_text,
            _ => continue,
        };
        // first occurrence wins when the model repeats a heading
        if slot.is_none() && !content.is_empty() {
            *slot = Some(content);
        }
    }

    if sections.alt_text.is_none() {
        warn!("no alt text section found; falling back to response prefix");
        sections.alt_text = Some(trimmed.chars().take(alt_budget).collect());
    }
    if sections.long_description.is_none() {
        warn!("no long description section found; falling back to full response");
        sections.long_description = Some(trimmed.to_string());
    }

    sections
}

/// Parse a structured JSON response, degrading to the heading scanner
/// when deserialization fails.
pub fn extract_structured(
    raw: &str,
    mode: GenerationMode,
    alt_budget: usize,
) -> AccessibilitySections {
    match serde_json::from_str::<StructuredSections>(raw.trim()) {
        Ok(parsed) => {
            let mut sections = AccessibilitySections {
                alt_text: non_empty(parsed.alt_text),
                figure_description: non_empty(parsed.figure_description),
                long_description: non_empty(parsed.long_description),
                transcribed_text: non_empty(parsed.transcribed_text),
                ..Default::default()
            };
            if sections.alt_text.is_none() {
                sections.alt_text = Some(raw.trim().chars().take(alt_budget).collect());
            }
            if sections.long_description.is_none() {
                sections.long_description = Some(raw.trim().to_string());
            }
            sections
        }
        Err(error) => {
            debug!("structured response did not parse ({error}); using heading scanner");
            extract(raw, mode, alt_budget)
        }
    }
}

/// Find all headings and slice the content between consecutive ones
fn scan_sections(raw: &str) -> Vec<(&'static str, String)> {
    let hits: Vec<(usize, usize, &'static str)> = SECTION_HEADING
        .captures_iter(raw)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let label = match captures.get(1)?.as_str().to_lowercase().as_str() {
                "alt text" => "alt text",
                "figure description" => "figure description",
                "long description" => "long description",
                "transcribed text" => "transcribed text",
                _ => return None,
            };
            Some((whole.start(), whole.end(), label))
        })
        .collect();

    hits.iter()
        .enumerate()
        .map(|(i, &(_, content_start, label))| {
            let content_end = hits.get(i + 1).map_or(raw.len(), |next| next.0);
            let content = raw[content_start..content_end]
                .trim()
                .trim_end_matches("---")
                .trim()
                .to_string();
            (label, content)
        })
        .collect()
}

/// Single-field modes: strip a leading label if the model added one
/// anyway, otherwise take the whole response.
fn single_field(trimmed: &str, _label: &str) -> String {
    if let Some(found) = SECTION_HEADING.find(trimmed) {
        if found.start() == 0 {
            let rest = trimmed[found.end()..].trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    trimmed.to_string()
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
