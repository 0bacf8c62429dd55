/*!
 * Common test utilities for the accessgen test suite
 */

use accessgen::app_config::GenerationConfig;

/// Image placeholder used across the suite
pub const TEST_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoTEST";

/// Build a labeled four-section response the way the model formats one
pub fn full_response(alt: &str, figure: &str, long: &str, transcribed: &str) -> String {
    format!(
        "**Alt Text (Character Count: {})**: {}\n\n\
         **Figure Description**: {}\n\n\
         **Long Description**: {}\n\n\
         **Transcribed Text**: {}",
        alt.chars().count(),
        alt,
        figure,
        long,
        transcribed
    )
}

/// Pipeline config with the classification pre-call disabled, so scripted
/// tests only have to queue the calls they are exercising
pub fn config_without_classification() -> GenerationConfig {
    GenerationConfig {
        detect_image_type: false,
        ..Default::default()
    }
}
