/*!
 * The accessibility-generation pipeline.
 *
 * One `generate` call drives the whole flow: optional image-type
 * classification, the primary vision request, section extraction, and
 * the per-field post-processing stages. Only the primary request can
 * fail the call; classification, escalation, and the length retry all
 * degrade to flags instead.
 */

use std::sync::Arc;

use log::{info, warn};

use crate::app_config::GenerationConfig;
use crate::errors::GenerationError;
use crate::postprocess::escalation::{Escalation, Escalator};
use crate::postprocess::length::{LengthEnforcer, LengthOutcome};
use crate::postprocess::{caption, expansion, extraction, lexicon};
use crate::prompts;
use crate::providers::{ChatMessage, ChatRequest, Provider};
use crate::sections::{
    AbbreviationSuggestion, CharacterCounts, GenerationMode, GenerationRequest, GenerationResult,
    ImageType, QaFlags,
};

/// Per-field outcome of expansion and escalation
#[derive(Debug, Default, Clone, Copy)]
struct FieldFlags {
    auto_fixed: bool,
    needs_review: bool,
    unknown_detected: bool,
}

/// Accessibility metadata generator bound to one provider
#[derive(Debug, Clone)]
pub struct AccessibilityGenerator {
    provider: Arc<dyn Provider>,
    config: GenerationConfig,
}

impl AccessibilityGenerator {
    /// Create a generator with explicit pipeline tunables
    pub fn new(provider: Arc<dyn Provider>, config: GenerationConfig) -> Self {
        Self { provider, config }
    }

    /// Create a generator with default tunables
    pub fn with_defaults(provider: Arc<dyn Provider>) -> Self {
        Self::new(provider, GenerationConfig::default())
    }

    /// Run the full pipeline for one request
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        if request.image.trim().is_empty() {
            return Err(GenerationError::MissingInput);
        }

        let image_type = if self.config.detect_image_type && request.mode == GenerationMode::Full {
            self.classify_image(&request.image).await
        } else {
            ImageType::Mixed
        };

        let raw = self.primary_request(request, image_type).await?;

        let mut sections = if self.config.structured_output && request.mode == GenerationMode::Full
        {
            extraction::extract_structured(&raw, request.mode, self.config.alt_text_budget)
        } else {
            extraction::extract(&raw, request.mode, self.config.alt_text_budget)
        };
        sections.image_type = image_type;

        let mut flags = QaFlags::default();
        let mut suggestions: Vec<AbbreviationSuggestion> = Vec::new();

        // figure description: boilerplate stripping, abbreviations flagged
        // for editorial review but never rewritten
        if let Some(figure) = sections.figure_description.take() {
            let cleaned = caption::sanitize(&figure);
            if lexicon::contains_known_abbreviation(&cleaned)
                || lexicon::looks_like_unknown_abbreviation(&cleaned)
            {
                flags.figure_description_needs_review = true;
            }
            sections.figure_description = Some(cleaned);
        }

        // alt text: expand, escalate, then enforce the budget last so the
        // final text is guaranteed to fit
        if let Some(alt) = sections.alt_text.take() {
            let (processed, field) = self
                .expand_and_escalate(alt, &request.image, &mut suggestions)
                .await;
            flags.alt_text_auto_fixed |= field.auto_fixed;
            flags.alt_text_needs_review |= field.needs_review;
            flags.unknown_abbreviation_detected |= field.unknown_detected;

            let enforcer = LengthEnforcer::new(
                self.provider.as_ref(),
                self.config.alt_text_budget,
                self.config.retry_temperature,
                self.config.retry_max_tokens,
            );
            let (fitted, outcome) = enforcer.enforce(&processed, &request.image).await;
            match outcome {
                LengthOutcome::WithinBudget => {}
                LengthOutcome::AutoFixed => flags.alt_text_auto_fixed = true,
                LengthOutcome::Truncated => flags.alt_text_too_long = true,
            }
            sections.alt_text = Some(fitted);
        }

        // long description: expand and escalate, no length budget
        if let Some(long) = sections.long_description.take() {
            let (processed, field) = self
                .expand_and_escalate(long, &request.image, &mut suggestions)
                .await;
            flags.long_description_auto_fixed |= field.auto_fixed;
            flags.long_description_needs_review |= field.needs_review;
            flags.unknown_abbreviation_detected |= field.unknown_detected;
            sections.long_description = Some(processed);
        }

        // transcribed text is contractually verbatim; never touched
        flags.transcribed_text_verbatim = sections.transcribed_text.is_some();

        let counts = CharacterCounts::from_sections(&sections);
        info!(
            "generation complete: alt={} chars, long={} chars, auto_fixed={}",
            counts.alt_text, counts.long_description, flags.alt_text_auto_fixed
        );

        Ok(GenerationResult {
            sections,
            counts,
            flags,
            unit_expansion_suggestions: suggestions,
            raw_response: raw,
        })
    }

    /// The one call that is allowed to fail the request
    async fn primary_request(
        &self,
        request: &GenerationRequest,
        image_type: ImageType,
    ) -> Result<String, GenerationError> {
        let prompt = prompts::generation_prompt(
            request.mode,
            image_type,
            request.context.as_deref(),
            request.reference_document.as_deref(),
            self.config.structured_output && request.mode == GenerationMode::Full,
        );

        let mut chat = ChatRequest::new(self.config.max_tokens)
            .temperature(self.config.temperature)
            .add_message(ChatMessage::user_text_and_image(prompt, &request.image));
        if self.config.structured_output && request.mode == GenerationMode::Full {
            chat = chat.json_response();
        }

        let response = self.provider.complete(chat).await?;
        if response.text.trim().is_empty() {
            return Err(GenerationError::MalformedResponse);
        }
        Ok(response.text)
    }

    /// Expand known abbreviations, then escalate anything unit-shaped
    /// the lexicon does not cover
    async fn expand_and_escalate(
        &self,
        text: String,
        image: &str,
        suggestions: &mut Vec<AbbreviationSuggestion>,
    ) -> (String, FieldFlags) {
        let mut flags = FieldFlags::default();
        let mut current = text;

        if lexicon::contains_known_abbreviation(&current) {
            let expanded = expansion::expand(&current);
            if expanded != current {
                flags.auto_fixed = true;
                current = expanded;
            }
        }

        if lexicon::looks_like_unknown_abbreviation(&current) {
            flags.unknown_detected = true;
            let escalator =
                Escalator::new(self.provider.as_ref(), self.config.escalation_max_tokens);
            match escalator.escalate(&current, image).await {
                Escalation::Applied { text, suggestion } => {
                    current = text;
                    flags.auto_fixed = true;
                    suggestions.push(suggestion);
                }
                Escalation::Flagged { suggestion } => {
                    flags.needs_review = true;
                    suggestions.push(suggestion);
                }
                Escalation::NoSnippet => {}
            }
        }

        (current, flags)
    }

    /// Classify the image so the prompt can lead with the right emphasis.
    /// Failures fall back to Mixed rather than failing the request.
    async fn classify_image(&self, image: &str) -> ImageType {
        let request = ChatRequest::new(self.config.classification_max_tokens)
            .temperature(self.config.classification_temperature)
            .add_message(ChatMessage::user_text_and_image(
                prompts::CLASSIFICATION_PROMPT,
                image,
            ));

        match self.provider.complete(request).await {
            Ok(response) => ImageType::from_classifier_reply(&response.text),
            Err(error) => {
                warn!("image classification failed ({error}); assuming mixed");
                ImageType::Mixed
            }
        }
    }
}
