/*!
 * End-to-end tests of the generation pipeline against scripted providers.
 *
 * Every test drives the public `generate` entry point and asserts on the
 * final result: section content, QA flags, counts, and the number and
 * order of provider calls.
 */

use std::sync::Arc;

use accessgen::errors::{GenerationError, ProviderError};
use accessgen::generator::AccessibilityGenerator;
use accessgen::providers::mock::MockProvider;
use accessgen::sections::{GenerationMode, GenerationRequest, ImageType};

use crate::common::{config_without_classification, full_response, TEST_IMAGE};

#[tokio::test]
async fn test_fullPipeline_withCleanResponse_shouldPopulateEverything() {
    let raw = full_response(
        "Bar chart of rainfall by month for three coastal cities.",
        "Coastal rainfall concentrates in the winter months.",
        "The bar chart plots monthly rainfall for three cities across one year.",
        "Rainfall by month\nJan Feb Mar",
    );
    let provider = MockProvider::scripted_ok(["CHART_GRAPH".to_string(), raw.clone()]);
    let generator = AccessibilityGenerator::with_defaults(Arc::new(provider.clone()));

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    assert_eq!(
        result.sections.alt_text.as_deref(),
        Some("Bar chart of rainfall by month for three coastal cities.")
    );
    assert_eq!(result.sections.image_type, ImageType::ChartGraph);
    assert!(result.sections.transcribed_text.as_deref().unwrap().starts_with("Rainfall"));
    assert_eq!(result.counts.alt_text, 56);
    assert!(!result.flags.alt_text_auto_fixed);
    assert!(!result.flags.alt_text_too_long);
    assert!(result.flags.transcribed_text_verbatim);
    assert!(result.unit_expansion_suggestions.is_empty());
    assert_eq!(result.raw_response, raw);
    // classification + primary, nothing else
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_fullPipeline_overBudgetAltWithUnits_shouldExpandThenRetry() {
    let long_alt = "Line graph showing dissolved oxygen concentration from 2 mg/L up to \
                    14 mg/L across the full temperature range measured in the study";
    let raw = full_response(
        long_alt,
        "Oxygen solubility falls as water warms.",
        "The line graph plots dissolved oxygen against temperature.",
        "DO (mg/L)",
    );
    let provider = MockProvider::scripted_ok([
        raw,
        "Line graph of dissolved oxygen falling as temperature rises.".to_string(),
    ]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider.clone()),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    let alt = result.sections.alt_text.as_deref().unwrap();
    assert_eq!(alt, "Line graph of dissolved oxygen falling as temperature rises.");
    assert!(result.counts.alt_text <= 120);
    assert!(result.flags.alt_text_auto_fixed);
    assert!(!result.flags.alt_text_too_long);
    // primary + one shortening retry
    assert_eq!(provider.call_count(), 2);

    // the retry prompt carried the expanded units, not the raw "mg/L"
    let requests = provider.requests();
    let retry_prompt = format!("{:?}", requests[1]);
    assert!(retry_prompt.contains("milligrams per liter"));
}

#[tokio::test]
async fn test_fullPipeline_retryStillLong_shouldTruncateAndFlag() {
    let long_alt = "x".repeat(160);
    let raw = full_response(&long_alt, "A caption.", "A long description.", "text");
    let provider = MockProvider::scripted_ok([raw, "y".repeat(200)]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    let alt = result.sections.alt_text.as_deref().unwrap();
    assert_eq!(alt.chars().count(), 120);
    assert!(alt.ends_with("..."));
    assert!(result.flags.alt_text_too_long);
}

#[tokio::test]
async fn test_fullPipeline_unknownAbbreviation_resolved_shouldApplyAndRecord() {
    let raw = full_response(
        "Plot of crop yield at 7 qz/ha across regions.",
        "Yields vary with irrigation.",
        "The plot compares regional crop yields.",
        "yield",
    );
    let provider = MockProvider::scripted_ok([
        raw,
        "quintals per hectare".to_string(),
    ]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider.clone()),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    let alt = result.sections.alt_text.as_deref().unwrap();
    assert_eq!(alt, "Plot of crop yield at 7 quintals per hectare across regions.");
    assert!(result.flags.alt_text_auto_fixed);
    assert!(result.flags.unknown_abbreviation_detected);
    assert!(!result.flags.alt_text_needs_review);

    assert_eq!(result.unit_expansion_suggestions.len(), 1);
    let suggestion = &result.unit_expansion_suggestions[0];
    assert_eq!(suggestion.snippet, "qz/ha");
    assert_eq!(suggestion.suggestion.as_deref(), Some("quintals per hectare"));
    // primary + escalation; the fixed alt fits, so no length retry
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_fullPipeline_escalationFailure_shouldFlagNotFail() {
    let raw = full_response(
        "Plot of crop yield at 7 qz/ha across regions.",
        "Yields vary with irrigation.",
        "The plot compares regional crop yields.",
        "yield",
    );
    let provider = MockProvider::scripted(vec![
        Ok(raw),
        Err(ProviderError::RequestFailed("connection reset".to_string())),
    ]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    // text unchanged, flagged for human review instead
    assert!(result
        .sections
        .alt_text
        .as_deref()
        .unwrap()
        .contains("qz/ha"));
    assert!(result.flags.alt_text_needs_review);
    assert!(result.flags.unknown_abbreviation_detected);
    assert_eq!(result.unit_expansion_suggestions[0].suggestion, None);
}

#[tokio::test]
async fn test_fullPipeline_primaryFailure_shouldMapStatusToError() {
    let provider = MockProvider::scripted(vec![Err(ProviderError::Unauthorized(
        "invalid key".to_string(),
    ))]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider),
        config_without_classification(),
    );

    let result = generator.generate(&GenerationRequest::new(TEST_IMAGE)).await;

    assert!(matches!(result, Err(GenerationError::UpstreamAuth(_))));
}

#[tokio::test]
async fn test_fullPipeline_missingImage_shouldRejectBeforeAnyCall() {
    let provider = MockProvider::working();
    let generator = AccessibilityGenerator::with_defaults(Arc::new(provider.clone()));

    let result = generator.generate(&GenerationRequest::new("")).await;

    assert!(matches!(result, Err(GenerationError::MissingInput)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_fullPipeline_captionWithUnits_shouldFlagButNotRewrite() {
    let raw = full_response(
        "Diagram of runoff into a bay.",
        "Figure 2. The diagram shows runoff at 50 mg/L entering the bay.",
        "The diagram traces agricultural runoff toward the coast.",
        "runoff",
    );
    let provider = MockProvider::scripted_ok([raw]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    let figure = result.sections.figure_description.as_deref().unwrap();
    // boilerplate stripped, abbreviation left in place
    assert_eq!(figure, "Runoff at 50 mg/L entering the bay.");
    assert!(result.flags.figure_description_needs_review);
    assert!(!result.flags.long_description_auto_fixed || figure.contains("mg/L"));
}

#[tokio::test]
async fn test_fullPipeline_longDescriptionUnits_shouldExpandInline() {
    let raw = full_response(
        "Titration curve near equivalence.",
        "The equivalence point sits near neutral.",
        "The curve rises steeply after adding 25 mL of titrant at 25°C.",
        "pH",
    );
    let provider = MockProvider::scripted_ok([raw]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    let long = result.sections.long_description.as_deref().unwrap();
    assert!(long.contains("25 milliliters of titrant"));
    assert!(long.contains("25 degrees Celsius"));
    assert!(result.flags.long_description_auto_fixed);
}

#[tokio::test]
async fn test_fullPipeline_transcribedText_shouldStayVerbatim() {
    let raw = full_response(
        "Chart of solubility.",
        "Solubility rises with temperature.",
        "The chart plots solubility against temperature.",
        "Solubility (mg/L) vs T (°C)",
    );
    let provider = MockProvider::scripted_ok([raw]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    // units in the transcription are never expanded
    assert_eq!(
        result.sections.transcribed_text.as_deref(),
        Some("Solubility (mg/L) vs T (°C)")
    );
    assert!(result.flags.transcribed_text_verbatim);
}

#[tokio::test]
async fn test_fullPipeline_structuredOutput_shouldParseJsonResponse() {
    let raw = r#"{"altText": "Pie chart of budget shares.",
        "figureDescription": "Salaries dominate spending.",
        "longDescription": "The pie chart divides spending into five wedges.",
        "transcribedText": "Salaries 60 percent"}"#;
    let provider = MockProvider::scripted_ok([raw]);
    let mut config = config_without_classification();
    config.structured_output = true;
    let generator = AccessibilityGenerator::new(Arc::new(provider.clone()), config);

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    assert_eq!(
        result.sections.alt_text.as_deref(),
        Some("Pie chart of budget shares.")
    );
    assert_eq!(
        result.sections.transcribed_text.as_deref(),
        Some("Salaries 60 percent")
    );

    // the provider was asked for a JSON object
    let requests = provider.requests();
    assert!(matches!(
        requests[0].response_format,
        accessgen::providers::ResponseFormat::JsonObject
    ));
}

#[tokio::test]
async fn test_altTextOnlyMode_overBudget_shouldStillEnforce() {
    let provider = MockProvider::scripted_ok([
        "z".repeat(180),
        "Compact description of the figure.".to_string(),
    ]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider.clone()),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE).with_mode(GenerationMode::AltTextOnly))
        .await
        .unwrap();

    assert_eq!(
        result.sections.alt_text.as_deref(),
        Some("Compact description of the figure.")
    );
    assert!(result.flags.alt_text_auto_fixed);
    assert!(result.sections.long_description.is_none());
    assert_eq!(result.counts.long_description, 0);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_longDescriptionOnlyMode_shouldReturnSingleField() {
    let provider =
        MockProvider::scripted_ok(["A complete walk-through of the figure layout."]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider.clone()),
        config_without_classification(),
    );

    let result = generator
        .generate(
            &GenerationRequest::new(TEST_IMAGE).with_mode(GenerationMode::LongDescriptionOnly),
        )
        .await
        .unwrap();

    assert_eq!(
        result.sections.long_description.as_deref(),
        Some("A complete walk-through of the figure layout.")
    );
    assert!(result.sections.alt_text.is_none());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_fullPipeline_responseWithoutHeadings_shouldFallBackNotFail() {
    let raw = "One unlabeled paragraph describing a map of ocean currents with warm \
               water moving poleward along the western boundaries of each basin.";
    let provider = MockProvider::scripted_ok([raw]);
    let generator = AccessibilityGenerator::new(
        Arc::new(provider),
        config_without_classification(),
    );

    let result = generator
        .generate(&GenerationRequest::new(TEST_IMAGE))
        .await
        .unwrap();

    assert!(result.counts.alt_text > 0);
    assert!(result.counts.alt_text <= 120);
    assert_eq!(result.sections.long_description.as_deref(), Some(raw));
    assert!(result.sections.figure_description.is_none());
}
