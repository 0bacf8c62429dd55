/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with a canned four-section response
 * - `MockProvider::scripted(..)` - Returns queued responses one call at a time
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::empty()` - Succeeds with an empty body
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{ChatRequest, ChatResponse, Provider};

/// A canned response that parses cleanly through the section extractor
pub const CANNED_FULL_RESPONSE: &str = "\
**Alt Text (Character Count: 62)**: Line graph of enzyme activity peaking at 37 degrees Celsius.

**Figure Description**: Enzyme activity peaks at body temperature and declines sharply above 40 degrees Celsius. This pattern shows why fevers impair metabolic function.

**Long Description**: This image is a line graph showing enzyme activity measured across a temperature range from 20 to 60 degrees Celsius, with a clear maximum at 37 degrees.

**Transcribed Text**: Enzyme activity (units)\n20\n30\n37\n40\n50\n60";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with the canned response
    Working,
    /// Pops queued responses in order; errors once the queue is exhausted
    Scripted,
    /// Always fails with an API error
    Failing,
    /// Returns an empty response body
    Empty,
}

/// Mock provider for testing pipeline behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Queued responses for scripted mode
    responses: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    /// Every request received, in call order
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that replays the given responses in order
    pub fn scripted<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<String, ProviderError>>,
    {
        let provider = Self::new(MockBehavior::Scripted);
        provider
            .responses
            .lock()
            .expect("mock response queue poisoned")
            .extend(responses);
        provider
    }

    /// Convenience: scripted provider where every entry is a success
    pub fn scripted_ok<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(responses.into_iter().map(|s| Ok(s.into())))
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of completed calls so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("mock request log poisoned").len()
    }

    /// Snapshot of every request received, in call order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .clone()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            responses: Arc::clone(&self.responses),
            requests: Arc::clone(&self.requests),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(request);

        let text = match self.behavior {
            MockBehavior::Working => CANNED_FULL_RESPONSE.to_string(),

            MockBehavior::Scripted => {
                let next = self
                    .responses
                    .lock()
                    .expect("mock response queue poisoned")
                    .pop_front();
                match next {
                    Some(Ok(text)) => text,
                    Some(Err(error)) => return Err(error),
                    None => {
                        return Err(ProviderError::RequestFailed(
                            "mock script exhausted".to_string(),
                        ))
                    }
                }
            }

            MockBehavior::Failing => {
                return Err(ProviderError::Upstream {
                    status_code: 500,
                    message: "Simulated provider failure".to_string(),
                })
            }

            MockBehavior::Empty => String::new(),
        };

        Ok(ChatResponse {
            prompt_tokens: Some(text.len() as u64),
            completion_tokens: Some((text.len() / 2) as u64),
            text,
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::Upstream {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),
            _ => Ok(()),
        }
    }
}
