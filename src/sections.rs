/*!
 * Data model for accessibility-generation requests and results.
 *
 * Field names serialize in camelCase to preserve the JSON contract of the
 * hosted service this library backs.
 */

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Which sections a request asks for
///
/// The serde names are the service's wire values for the `type` request
/// parameter, not the Rust variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenerationMode {
    /// All four sections
    #[default]
    #[serde(rename = "full", alias = "both")]
    Full,
    /// Alt text only; the whole response is the field
    #[serde(rename = "alt-text")]
    AltTextOnly,
    /// Long description only; the whole response is the field
    #[serde(rename = "long-description")]
    LongDescriptionOnly,
}

impl std::str::FromStr for GenerationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" | "both" => Ok(Self::Full),
            "alt-text" => Ok(Self::AltTextOnly),
            "long-description" => Ok(Self::LongDescriptionOnly),
            _ => Err(anyhow!(
                "Invalid mode: {} (use one of: full, alt-text, long-description)",
                s
            )),
        }
    }
}

/// Broad classification of the submitted image, used to pick the prompt shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    /// Charts, graphs, data visualizations
    ChartGraph,
    /// Scientific diagrams, biological illustrations, technical schematics
    ScientificFigure,
    /// Regular photographs of people, animals, objects, scenes
    Photograph,
    /// Combination of data visualization and photograph, or unknown
    #[default]
    Mixed,
}

impl ImageType {
    /// Parse a classification reply; anything unrecognized maps to Mixed
    pub fn from_classifier_reply(reply: &str) -> Self {
        match reply.trim().to_uppercase().as_str() {
            "CHART_GRAPH" => Self::ChartGraph,
            "SCIENTIFIC_FIGURE" => Self::ScientificFigure,
            "PHOTOGRAPH" => Self::Photograph,
            _ => Self::Mixed,
        }
    }
}

/// One accessibility-generation request
///
/// Owned by the request handler for its lifetime; the pipeline never
/// mutates it. Input validation (well-formed JSON, image presence) is the
/// caller's job, though an empty image is still rejected defensively.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Image as a data URL or https URL
    pub image: String,

    /// Optional free-text context ("used in Chapter 3 on water quality")
    #[serde(default)]
    pub context: Option<String>,

    /// Optional additional reference document appended to the standards block
    #[serde(default)]
    pub reference_document: Option<String>,

    /// Which sections to generate
    #[serde(default, rename = "type")]
    pub mode: GenerationMode,
}

impl GenerationRequest {
    /// Create a full-mode request for the given image
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            context: None,
            reference_document: None,
            mode: GenerationMode::Full,
        }
    }

    /// Set the usage context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set an additional reference document
    pub fn with_reference_document(mut self, document: impl Into<String>) -> Self {
        self.reference_document = Some(document.into());
        self
    }

    /// Set the generation mode
    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }
}

/// The four semantic fields parsed out of one model response
///
/// Fields are rewritten in place by the post-processing stages and become
/// immutable once assembled into a [`GenerationResult`]. The transcribed
/// text is contractually verbatim and is never touched after extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySections {
    /// Screen-reader description, budgeted at 120 characters
    pub alt_text: Option<String>,

    /// Interpretive 1-3 sentence summary of what the figure means
    pub figure_description: Option<String>,

    /// Comprehensive structural description
    pub long_description: Option<String>,

    /// Verbatim copy of all visible text in the image
    pub transcribed_text: Option<String>,

    /// Detected image classification
    pub image_type: ImageType,
}

/// QA annotations describing what was auto-fixed vs. flagged for review
///
/// Derived entirely from pipeline execution; never set by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaFlags {
    /// Alt text was rewritten (unit expansion, escalation, or length retry)
    pub alt_text_auto_fixed: bool,

    /// Long description was rewritten by unit expansion or escalation
    pub long_description_auto_fixed: bool,

    /// Figure description contains abbreviations; editorial review required
    pub figure_description_needs_review: bool,

    /// Alt text had to be truncated to meet the character budget
    pub alt_text_too_long: bool,

    /// Alt text contains an unresolved abbreviation
    pub alt_text_needs_review: bool,

    /// Long description contains an unresolved abbreviation
    pub long_description_needs_review: bool,

    /// A suspected abbreviation outside the lexicon was found somewhere
    pub unknown_abbreviation_detected: bool,

    /// Transcribed text was left untouched (always true when present)
    pub transcribed_text_verbatim: bool,
}

/// A suspected abbreviation and the expansion applied for it, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbbreviationSuggestion {
    /// The suspect snippet found in the text
    pub snippet: String,

    /// The expansion that replaced it, or None when unresolved
    pub suggestion: Option<String>,
}

/// Character counts per field, always present (0 when the field is absent)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCounts {
    pub alt_text: usize,
    pub figure_description: usize,
    pub long_description: usize,
    pub transcribed_text: usize,
}

impl CharacterCounts {
    /// Measure the final sections
    pub fn from_sections(sections: &AccessibilitySections) -> Self {
        let count = |field: &Option<String>| {
            field.as_deref().map_or(0, |s| s.chars().count())
        };
        Self {
            alt_text: count(&sections.alt_text),
            figure_description: count(&sections.figure_description),
            long_description: count(&sections.long_description),
            transcribed_text: count(&sections.transcribed_text),
        }
    }
}

/// Final structured result of one generation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// The post-processed sections
    pub sections: AccessibilitySections,

    /// Character counts per field
    pub counts: CharacterCounts,

    /// QA flags describing auto-fixes and review markers
    pub flags: QaFlags,

    /// Abbreviation expansions applied or flagged during processing
    pub unit_expansion_suggestions: Vec<AbbreviationSuggestion>,

    /// The unmodified primary model response, echoed for debugging
    pub raw_response: String,
}
