use std::sync::Arc;

use crate::metrics;
use crate::models::hint::{HintResponse, MatchHintRequest, MathHintRequest, SyllableHintRequest};

use super::completion_client::{ChatMessage, CompletionClient, CompletionRequest};
use super::fallback::{self, Endpoint, FallbackReason};
use super::prompts;

/// Syllable, match and counting hints. Never fails: every problem with the
/// completion call turns into the endpoint's static hint.
pub struct HintService {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl HintService {
    pub fn new(client: Arc<dyn CompletionClient>, model: String) -> Self {
        Self { client, model }
    }

    pub async fn syllable_hint(&self, req: &SyllableHintRequest) -> HintResponse {
        tracing::info!(
            target_syllable = ?req.target_syllable,
            slots = ?req.slots,
            letters = ?req.letters,
            "Processing syllable hint request"
        );

        let messages = prompts::syllable_hint(
            req.target_syllable.as_ref(),
            req.slots.as_ref(),
            req.letters.as_ref(),
        );

        let hint = self
            .hint_or_fallback(
                Endpoint::SyllableHint,
                messages,
                prompts::SYLLABLE_HINT_MAX_TOKENS,
                fallback::syllable_hint,
            )
            .await;

        HintResponse::new(hint)
    }

    pub async fn match_hint(&self, req: &MatchHintRequest) -> HintResponse {
        tracing::info!(
            target_word = ?req.target_word,
            options = ?req.options,
            "Processing match hint request"
        );

        let messages = prompts::match_hint(req.target_word.as_ref(), req.options.as_ref());

        let hint = self
            .hint_or_fallback(
                Endpoint::MatchHint,
                messages,
                prompts::MATCH_HINT_MAX_TOKENS,
                |_| fallback::match_hint(req.target_word.as_ref()),
            )
            .await;

        HintResponse::new(hint)
    }

    pub async fn math_hint(&self, req: &MathHintRequest) -> HintResponse {
        tracing::info!(
            target_number = ?req.target_number,
            options = ?req.options,
            "Processing math hint request"
        );

        // Options that are present but not a list never reach the model.
        if req.options.as_ref().is_some_and(|options| !options.is_array()) {
            tracing::warn!(
                endpoint = Endpoint::MathHint.path(),
                "Options are not a list, serving fallback"
            );
            metrics::record_fallback(Endpoint::MathHint, FallbackReason::InvalidInput);
            return HintResponse::new(fallback::math_hint());
        }

        let messages = prompts::math_hint(req.target_number.as_ref(), req.options.as_ref());

        let hint = self
            .hint_or_fallback(
                Endpoint::MathHint,
                messages,
                prompts::MATH_HINT_MAX_TOKENS,
                |_| fallback::math_hint(),
            )
            .await;

        HintResponse::new(hint)
    }

    /// Trimmed model text, or `on_fallback(reason)` on error or blank output.
    async fn hint_or_fallback<F>(
        &self,
        endpoint: Endpoint,
        messages: Vec<ChatMessage>,
        max_output_tokens: u32,
        on_fallback: F,
    ) -> String
    where
        F: FnOnce(FallbackReason) -> String,
    {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            max_output_tokens,
        };

        let reason =
            match metrics::track_upstream_call(endpoint, self.client.complete(&request)).await {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        tracing::debug!(endpoint = endpoint.path(), "Hint generated by model");
                        return text.to_string();
                    }
                    tracing::warn!(endpoint = endpoint.path(), "Model returned empty hint");
                    FallbackReason::EmptyOutput
                }
                Err(e) => {
                    tracing::error!(
                        endpoint = endpoint.path(),
                        code = e.code(),
                        "Completion call failed: {}",
                        e
                    );
                    FallbackReason::UpstreamError
                }
            };

        metrics::record_fallback(endpoint, reason);
        on_fallback(reason)
    }
}
