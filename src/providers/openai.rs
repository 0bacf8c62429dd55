use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::ProviderError;
use crate::providers::{ChatRequest, ChatResponse, MessagePart, Provider, ResponseFormat};

/// OpenAI client for the chat-completions API with vision input
#[derive(Debug)]
pub struct OpenAi {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Model name sent with every request
    model: String,
}

/// Wire format of one message in the chat-completions payload
#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: Vec<serde_json::Value>,
}

/// Chat-completions response
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

/// The assistant message within a choice
#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

impl OpenAi {
    /// Create a new OpenAI client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    fn api_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.openai.com/v1/chat/completions".to_string()
        } else {
            format!(
                "{}/v1/chat/completions",
                self.endpoint.trim_end_matches('/')
            )
        }
    }

    /// Convert the provider-agnostic request into the wire payload
    fn build_payload(&self, request: &ChatRequest) -> serde_json::Value {
        let messages: Vec<WireMessage<'_>> = request
            .messages
            .iter()
            .map(|message| WireMessage {
                role: &message.role,
                content: message
                    .content
                    .iter()
                    .map(|part| match part {
                        MessagePart::Text { text } => json!({ "type": "text", "text": text }),
                        MessagePart::ImageUrl { image_url } => json!({
                            "type": "image_url",
                            "image_url": image_url,
                        }),
                    })
                    .collect(),
            })
            .collect();

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
        });
        if let Some(temperature) = request.temperature {
            payload["temperature"] = json!(temperature);
        }
        if request.response_format == ResponseFormat::JsonObject {
            payload["response_format"] = json!({ "type": "json_object" });
        }
        payload
    }
}

#[async_trait]
impl Provider for OpenAi {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let payload = self.build_payload(&request);

        let response = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Unauthorized(error_text),
                429 => ProviderError::RateLimited(error_text),
                400 => ProviderError::BadRequest(error_text),
                code => ProviderError::Upstream {
                    status_code: code,
                    message: error_text,
                },
            });
        }

        let parsed = response
            .json::<OpenAiResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))?;

        Ok(ChatResponse {
            text: choice.message.content.unwrap_or_default(),
            prompt_tokens: parsed.usage.as_ref().and_then(|u| u.prompt_tokens),
            completion_tokens: parsed.usage.as_ref().and_then(|u| u.completion_tokens),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = ChatRequest::new(10)
            .add_message(crate::providers::ChatMessage::user_text("Hello"));
        self.complete(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ChatMessage;

    #[test]
    fn test_apiUrl_withEmptyEndpoint_shouldUsePublicApi() {
        let client = OpenAi::new("key", "", "gpt-4o", 120);
        assert_eq!(client.api_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_apiUrl_withCustomEndpoint_shouldTrimTrailingSlash() {
        let client = OpenAi::new("key", "http://localhost:8080/", "gpt-4o", 120);
        assert_eq!(
            client.api_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_buildPayload_withImageMessage_shouldSerializeContentParts() {
        let client = OpenAi::new("key", "", "gpt-4o", 120);
        let request = ChatRequest::new(900)
            .temperature(0.6)
            .add_message(ChatMessage::user_text_and_image(
                "Describe this image",
                "data:image/png;base64,AAAA",
            ));

        let payload = client.build_payload(&request);

        assert_eq!(payload["model"], "gpt-4o");
        assert_eq!(payload["max_tokens"], 900);
        let content = &payload["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_buildPayload_withJsonFormat_shouldRequestJsonObject() {
        let client = OpenAi::new("key", "", "gpt-4o", 120);
        let request = ChatRequest::new(900)
            .json_response()
            .add_message(ChatMessage::user_text("hi"));

        let payload = client.build_payload(&request);

        assert_eq!(payload["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_buildPayload_withoutTemperature_shouldOmitField() {
        let client = OpenAi::new("key", "", "gpt-4o", 120);
        let request = ChatRequest::new(40).add_message(ChatMessage::user_text("hi"));

        let payload = client.build_payload(&request);

        assert!(payload.get("temperature").is_none());
    }
}
