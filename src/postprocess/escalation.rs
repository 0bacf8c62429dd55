/*!
 * Escalation for abbreviations outside the lexicon.
 *
 * When a field carries something unit-shaped the lexicon cannot expand,
 * a single zero-temperature query asks the model to spell it out using
 * the image for context. An honest "UNKNOWN", an empty reply, or a
 * transport error all degrade to a review flag; escalation never fails
 * the request.
 */

use log::{debug, warn};

use crate::postprocess::lexicon;
use crate::prompts;
use crate::providers::{ChatMessage, ChatRequest, Provider};
use crate::sections::AbbreviationSuggestion;

/// Sentinel the model returns when it cannot identify the abbreviation
const UNKNOWN_SENTINEL: &str = "UNKNOWN";

/// Result of one escalation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escalation {
    /// No unit-like snippet could be isolated from the text
    NoSnippet,
    /// The model supplied an expansion and it was applied in place
    Applied {
        text: String,
        suggestion: AbbreviationSuggestion,
    },
    /// The model could not resolve it, or the call failed
    Flagged { suggestion: AbbreviationSuggestion },
}

/// One-shot escalator bound to a provider
pub struct Escalator<'a> {
    provider: &'a dyn Provider,
    max_tokens: u32,
}

impl<'a> Escalator<'a> {
    pub fn new(provider: &'a dyn Provider, max_tokens: u32) -> Self {
        Self { provider, max_tokens }
    }

    /// Try to resolve the first suspect snippet in the text
    pub async fn escalate(&self, text: &str, image: &str) -> Escalation {
        let Some(snippet) = lexicon::find_suspect_snippet(text) else {
            return Escalation::NoSnippet;
        };

        debug!("escalating unrecognized abbreviation {snippet:?}");
        let request = ChatRequest::new(self.max_tokens)
            .temperature(0.0)
            .add_message(ChatMessage::user_text_and_image(
                prompts::expansion_prompt(&snippet),
                image,
            ));

        match self.provider.complete(request).await {
            Ok(response) => {
                let reply = response.text.trim().to_string();
                if reply.is_empty() || reply.eq_ignore_ascii_case(UNKNOWN_SENTINEL) {
                    Escalation::Flagged {
                        suggestion: AbbreviationSuggestion {
                            snippet,
                            suggestion: None,
                        },
                    }
                } else {
                    let updated = text.replace(&snippet, &reply);
                    Escalation::Applied {
                        text: updated,
                        suggestion: AbbreviationSuggestion {
                            snippet,
                            suggestion: Some(reply),
                        },
                    }
                }
            }
            Err(error) => {
                warn!("abbreviation escalation failed ({error}); flagging for review");
                Escalation::Flagged {
                    suggestion: AbbreviationSuggestion {
                        snippet,
                        suggestion: None,
                    },
                }
            }
        }
    }
}
