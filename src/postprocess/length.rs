/*!
 * Alt-text character-budget enforcement.
 *
 * Over-budget alt text gets exactly one low-temperature rewrite request.
 * If the rewrite is still too long, fails, or comes back empty, the text
 * is hard-truncated with an ellipsis so the output never exceeds the
 * budget, and the truncation is reported for QA.
 */

use log::{debug, info, warn};

use crate::prompts;
use crate::providers::{ChatMessage, ChatRequest, Provider};

/// Default alt-text budget, in characters
pub const DEFAULT_ALT_TEXT_BUDGET: usize = 120;

/// How a piece of alt text came to fit the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthOutcome {
    /// Already within budget; text untouched
    WithinBudget,
    /// The rewrite request produced a fitting replacement
    AutoFixed,
    /// Hard-truncated after the rewrite failed or still ran long
    Truncated,
}

/// Budget enforcer bound to a provider for the single rewrite attempt
pub struct LengthEnforcer<'a> {
    provider: &'a dyn Provider,
    budget: usize,
    retry_temperature: f32,
    retry_max_tokens: u32,
}

impl<'a> LengthEnforcer<'a> {
    pub fn new(
        provider: &'a dyn Provider,
        budget: usize,
        retry_temperature: f32,
        retry_max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            budget,
            retry_temperature,
            retry_max_tokens,
        }
    }

    /// Bring alt text within budget, with at most one model call
    pub async fn enforce(&self, alt_text: &str, image: &str) -> (String, LengthOutcome) {
        let length = alt_text.chars().count();
        if length <= self.budget {
            return (alt_text.to_string(), LengthOutcome::WithinBudget);
        }

        debug!(
            "alt text over budget ({length} > {}); requesting rewrite",
            self.budget
        );
        let request = ChatRequest::new(self.retry_max_tokens)
            .temperature(self.retry_temperature)
            .add_message(ChatMessage::user_text_and_image(
                prompts::shorten_prompt(alt_text, length, self.budget),
                image,
            ));

        match self.provider.complete(request).await {
            Ok(response) => {
                let rewritten = strip_surrounding_quotes(response.text.trim());
                if !rewritten.is_empty() && rewritten.chars().count() <= self.budget {
                    info!("alt text rewrite fit the budget");
                    (rewritten.to_string(), LengthOutcome::AutoFixed)
                } else {
                    warn!("alt text rewrite still over budget; truncating");
                    let basis = if rewritten.is_empty() { alt_text } else { rewritten };
                    (truncate_with_ellipsis(basis, self.budget), LengthOutcome::Truncated)
                }
            }
            Err(error) => {
                warn!("alt text rewrite failed ({error}); truncating");
                (
                    truncate_with_ellipsis(alt_text, self.budget),
                    LengthOutcome::Truncated,
                )
            }
        }
    }
}

/// Drop one pair of quotes the model wrapped its answer in
fn strip_surrounding_quotes(text: &str) -> &str {
    let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    let text = text.strip_suffix(['"', '\'']).unwrap_or(text);
    text.trim()
}

/// Truncate to the budget, reserving room for the ellipsis
fn truncate_with_ellipsis(text: &str, budget: usize) -> String {
    let kept: String = text.chars().take(budget.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
