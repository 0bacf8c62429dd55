/*!
 * Tests pinning the serialized shape of results.
 *
 * Downstream consumers read these JSON documents, so the camelCase field
 * names and the flag set are a contract, not an implementation detail.
 */

use std::sync::Arc;

use accessgen::generator::AccessibilityGenerator;
use accessgen::providers::mock::MockProvider;
use accessgen::sections::GenerationRequest;
use serde_json::Value;

use crate::common::{config_without_classification, full_response, TEST_IMAGE};

async fn generate_json() -> Value {
    let raw = full_response(
        "Line chart of reservoir levels over one decade.",
        "Reservoir levels decline steadily after 2015.",
        "The line chart tracks reservoir storage from 2010 through 2020.",
        "Storage (%)\n2010 2015 2020",
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
    serde_json::to_value(&result).unwrap()
}

#[tokio::test]
async fn test_resultJson_shouldUseCamelCaseTopLevelKeys() {
    let json = generate_json().await;

    assert!(json.get("sections").is_some());
    assert!(json.get("counts").is_some());
    assert!(json.get("flags").is_some());
    assert!(json.get("unitExpansionSuggestions").is_some());
    assert!(json.get("rawResponse").is_some());
}

#[tokio::test]
async fn test_resultJson_sections_shouldUseContractFieldNames() {
    let json = generate_json().await;
    let sections = &json["sections"];

    assert!(sections.get("altText").is_some());
    assert!(sections.get("figureDescription").is_some());
    assert!(sections.get("longDescription").is_some());
    assert!(sections.get("transcribedText").is_some());
    assert_eq!(sections["imageType"], "MIXED");
}

#[tokio::test]
async fn test_resultJson_flags_shouldListEveryQaFlag() {
    let json = generate_json().await;
    let flags = &json["flags"];

    for key in [
        "altTextAutoFixed",
        "longDescriptionAutoFixed",
        "figureDescriptionNeedsReview",
        "altTextTooLong",
        "altTextNeedsReview",
        "longDescriptionNeedsReview",
        "unknownAbbreviationDetected",
        "transcribedTextVerbatim",
    ] {
        assert!(flags.get(key).is_some(), "missing flag {key}");
    }
}

#[tokio::test]
async fn test_resultJson_counts_shouldMatchSectionLengths() {
    let json = generate_json().await;

    let alt = json["sections"]["altText"].as_str().unwrap();
    assert_eq!(
        json["counts"]["altText"].as_u64().unwrap() as usize,
        alt.chars().count()
    );
}

#[test]
fn test_requestJson_shouldAcceptServiceFieldNames() {
    let request: GenerationRequest = serde_json::from_str(
        r#"{
            "image": "data:image/png;base64,AAAA",
            "context": "unit 4",
            "referenceDocument": "house style notes",
            "type": "long-description"
        }"#,
    )
    .unwrap();

    assert_eq!(request.context.as_deref(), Some("unit 4"));
    assert_eq!(request.reference_document.as_deref(), Some("house style notes"));
}
