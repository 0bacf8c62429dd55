/*!
 * Application configuration.
 *
 * Loaded from a JSON file when one is given, otherwise built from
 * defaults and overridden by CLI flags and environment variables.
 * Every field has a default so a minimal config only needs the API key.
 */

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::postprocess::length::DEFAULT_ALT_TEXT_BUDGET;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the corresponding log crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; required, but usually supplied via environment
    #[serde(default)]
    pub api_key: String,

    /// Custom endpoint; empty means the public OpenAI API
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Tunables for the generation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Temperature of the primary generation call
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token budget of the primary generation call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature of the alt-text shortening retry
    #[serde(default = "default_retry_temperature")]
    pub retry_temperature: f32,

    /// Token budget of the alt-text shortening retry
    #[serde(default = "default_retry_max_tokens")]
    pub retry_max_tokens: u32,

    /// Token budget of the abbreviation escalation call
    #[serde(default = "default_escalation_max_tokens")]
    pub escalation_max_tokens: u32,

    /// Token budget of the classification call
    #[serde(default = "default_classification_max_tokens")]
    pub classification_max_tokens: u32,

    /// Temperature of the classification call
    #[serde(default = "default_classification_temperature")]
    pub classification_temperature: f32,

    /// Alt-text character budget
    #[serde(default = "default_alt_text_budget")]
    pub alt_text_budget: usize,

    /// Run the image-type classification call before generating
    #[serde(default = "default_detect_image_type")]
    pub detect_image_type: bool,

    /// Request structured JSON output instead of labeled sections
    #[serde(default)]
    pub structured_output: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            retry_temperature: default_retry_temperature(),
            retry_max_tokens: default_retry_max_tokens(),
            escalation_max_tokens: default_escalation_max_tokens(),
            classification_max_tokens: default_classification_max_tokens(),
            classification_temperature: default_classification_temperature(),
            alt_text_budget: default_alt_text_budget(),
            detect_image_type: default_detect_image_type(),
            structured_output: false,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Generation pipeline tunables
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Log level for the application
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that the configuration can actually be used
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.trim().is_empty() {
            return Err(anyhow!(
                "No API key configured. Set it in the config file or via OPENAI_API_KEY"
            ));
        }
        if self.generation.alt_text_budget < 20 {
            return Err(anyhow!(
                "alt_text_budget of {} is too small to hold a sentence",
                self.generation.alt_text_budget
            ));
        }
        Ok(())
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.6
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_retry_temperature() -> f32 {
    0.3
}

fn default_retry_max_tokens() -> u32 {
    100
}

fn default_escalation_max_tokens() -> u32 {
    40
}

fn default_classification_max_tokens() -> u32 {
    20
}

fn default_classification_temperature() -> f32 {
    0.1
}

fn default_alt_text_budget() -> usize {
    DEFAULT_ALT_TEXT_BUDGET
}

fn default_detect_image_type() -> bool {
    true
}
