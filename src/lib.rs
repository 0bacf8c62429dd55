/*!
 * accessgen - accessibility metadata generation for educational images
 *
 * This library turns one image into a set of accessibility descriptions
 * (alt text, figure description, long description, transcribed text) by
 * driving a vision-capable chat model and post-processing its output:
 * unit abbreviations are expanded into spoken forms, caption boilerplate
 * is stripped, the alt-text character budget is enforced with a single
 * bounded retry, and everything that could not be fixed automatically is
 * reported through QA flags.
 */

/// Application configuration handling
pub mod app_config;
/// Error types used throughout the application
pub mod errors;
/// The generation pipeline
pub mod generator;
/// Post-processing stages for model output
pub mod postprocess;
/// Prompt construction
pub mod prompts;
/// Upstream model providers
pub mod providers;
/// Request and result data model
pub mod sections;

pub use app_config::Config;
pub use errors::{GenerationError, ProviderError};
pub use generator::AccessibilityGenerator;
pub use sections::{GenerationMode, GenerationRequest, GenerationResult};
