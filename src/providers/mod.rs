/*!
 * Provider implementations for multimodal chat-completion services.
 *
 * This module contains client implementations for upstream model providers:
 * - OpenAI: OpenAI chat-completions API with vision support
 * - Mock: scripted in-memory provider for testing
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all chat-completion providers
///
/// The trait is object-safe so the generation pipeline can hold an
/// `Arc<dyn Provider>` injected at construction time.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a chat request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<ChatResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// One part of a multimodal message: plain text or an image reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    /// Plain text content
    Text {
        /// The text itself
        text: String,
    },
    /// An image given as a data URL or https URL
    ImageUrl {
        /// The image reference
        image_url: ImageUrl,
    },
}

/// Image reference within a message part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Data URL or https URL of the image
    pub url: String,

    /// Requested detail level ("low", "high", "auto")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content parts of the message
    pub content: Vec<MessagePart>,
}

impl ChatMessage {
    /// Create a user message containing only text
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// Create a user message containing text followed by an image
    pub fn user_text_and_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![
                MessagePart::Text { text: text.into() },
                MessagePart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                        detail: Some("high".to_string()),
                    },
                },
            ],
        }
    }

    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: vec![MessagePart::Text { text: text.into() }],
        }
    }
}

/// Response format requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form text (default)
    Text,
    /// Force a well-formed JSON object
    JsonObject,
}

/// Provider-agnostic chat completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,

    /// Temperature for generation
    pub temperature: Option<f32>,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,

    /// Requested response format
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    /// Create a new request with the given completion budget
    pub fn new(max_tokens: u32) -> Self {
        Self {
            messages: Vec::new(),
            temperature: None,
            max_tokens,
            response_format: ResponseFormat::Text,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Request a JSON object response
    pub fn json_response(mut self) -> Self {
        self.response_format = ResponseFormat::JsonObject;
        self
    }
}

/// Provider-agnostic chat completion response
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The generated text
    pub text: String,

    /// Number of prompt tokens consumed, when reported
    pub prompt_tokens: Option<u64>,

    /// Number of completion tokens generated, when reported
    pub completion_tokens: Option<u64>,
}

pub mod mock;
pub mod openai;
