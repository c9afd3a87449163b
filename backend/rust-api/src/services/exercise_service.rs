use serde_json::Value;
use std::sync::Arc;

use crate::metrics;
use crate::models::exercise::{Exercise, ExerciseResponse};

use super::completion_client::{CompletionClient, CompletionRequest};
use super::fallback::{self, Endpoint, FallbackReason};
use super::prompts;

/// Generates syllable exercises with the model and keeps only well-formed ones.
pub struct ExerciseService {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl ExerciseService {
    pub fn new(client: Arc<dyn CompletionClient>, model: String) -> Self {
        Self { client, model }
    }

    /// Never fails. An upstream error yields the built-in list plus the
    /// `no_ai` marker; unusable output yields the built-in list alone.
    pub async fn generate(&self, count: usize) -> ExerciseResponse {
        tracing::info!(count, "Processing exercises request");

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: prompts::exercises(count),
            max_output_tokens: prompts::EXERCISES_MAX_TOKENS,
        };

        match metrics::track_upstream_call(Endpoint::Exercises, self.client.complete(&request))
            .await
        {
            Ok(raw) => {
                let exercises = Self::sanitize(&raw, count);
                if !exercises.is_empty() {
                    tracing::debug!(accepted = exercises.len(), "Exercises generated by model");
                    return ExerciseResponse {
                        error: None,
                        exercises,
                    };
                }

                let reason = if raw.trim().is_empty() {
                    FallbackReason::EmptyOutput
                } else {
                    FallbackReason::InvalidOutput
                };
                tracing::info!(reason = reason.label(), "Serving built-in exercises");
                metrics::record_fallback(Endpoint::Exercises, reason);

                ExerciseResponse {
                    error: None,
                    exercises: fallback::exercises(count),
                }
            }
            Err(e) => {
                tracing::error!(
                    endpoint = Endpoint::Exercises.path(),
                    code = e.code(),
                    "Completion call failed: {}",
                    e
                );
                metrics::record_fallback(Endpoint::Exercises, FallbackReason::UpstreamError);

                ExerciseResponse {
                    error: Some(fallback::NO_AI_MARKER.to_string()),
                    exercises: fallback::exercises(count),
                }
            }
        }
    }

    /// Parses raw model output into at most `count` exercises.
    ///
    /// Accepts a bare array or an object carrying the array under `exercises`
    /// (or `data`). Entries without a non-empty `syllable` string or without
    /// exactly two `letters` are dropped.
    pub fn sanitize(raw: &str, count: usize) -> Vec<Exercise> {
        let payload: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Model output is not JSON: {}", e);
                return Vec::new();
            }
        };

        let entries: &[Value] = match &payload {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => match map
                .get("exercises")
                .filter(|v| is_truthy(v))
                .or_else(|| map.get("data").filter(|v| is_truthy(v)))
            {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            },
            _ => &[],
        };

        entries
            .iter()
            .filter_map(parse_exercise)
            .take(count)
            .collect()
    }
}

fn parse_exercise(entry: &Value) -> Option<Exercise> {
    let syllable = entry.get("syllable")?.as_str()?;
    if syllable.is_empty() {
        return None;
    }

    let letters = match entry.get("letters")?.as_array()?.as_slice() {
        [first, second] => [
            prompts::render_scalar(Some(first)),
            prompts::render_scalar(Some(second)),
        ],
        _ => return None,
    };

    // Blank hints count as missing.
    let hint = match entry.get("hint").and_then(Value::as_str) {
        Some(hint) if !hint.trim().is_empty() => hint.to_string(),
        _ => format!("{} + {}", letters[0], letters[1]),
    };

    Some(Exercise {
        syllable: syllable.to_string(),
        letters,
        hint,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::completion_client::CompletionError;
    use async_trait::async_trait;
    use serde_json::json;

    #[test]
    fn test_sanitize_accepts_bare_array() {
        let raw = json!([
            { "syllable": "MA", "letters": ["M", "A"], "hint": "M + A" },
            { "syllable": "PO", "letters": ["P", "O"], "hint": "P + O" }
        ])
        .to_string();

        let exercises = ExerciseService::sanitize(&raw, 5);
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[1].syllable, "PO");
        assert_eq!(exercises[1].letters, ["P".to_string(), "O".to_string()]);
    }

    #[test]
    fn test_sanitize_accepts_wrapped_arrays() {
        let wrapped = json!({ "exercises": [{ "syllable": "LU", "letters": ["L", "U"] }] });
        let exercises = ExerciseService::sanitize(&wrapped.to_string(), 5);
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].hint, "L + U");

        let data = json!({ "exercises": null, "data": [{ "syllable": "SE", "letters": ["S", "E"], "hint": "S + E" }] });
        let exercises = ExerciseService::sanitize(&data.to_string(), 5);
        assert_eq!(exercises[0].syllable, "SE");
    }

    #[test]
    fn test_sanitize_replaces_blank_hints() {
        let raw = json!([
            { "syllable": "MA", "letters": ["M", "A"], "hint": "" },
            { "syllable": "PE", "letters": ["P", "E"], "hint": "   " },
            { "syllable": "LI", "letters": ["L", "I"], "hint": 7 }
        ])
        .to_string();

        let exercises = ExerciseService::sanitize(&raw, 5);
        assert_eq!(exercises.len(), 3);
        assert_eq!(exercises[0].hint, "M + A");
        assert_eq!(exercises[1].hint, "P + E");
        assert_eq!(exercises[2].hint, "L + I");
        assert!(exercises.iter().all(|e| !e.hint.trim().is_empty()));
    }

    #[test]
    fn test_sanitize_drops_malformed_entries() {
        let raw = json!([
            { "syllable": "", "letters": ["M", "A"] },
            { "syllable": "MA", "letters": ["M"] },
            { "syllable": "MA", "letters": ["M", "A", "X"] },
            { "syllable": "MA", "letters": "MA" },
            { "letters": ["T", "A"] },
            "TA",
            { "syllable": "TE", "letters": ["T", "E"], "hint": "T + E" }
        ])
        .to_string();

        let exercises = ExerciseService::sanitize(&raw, 10);
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].syllable, "TE");
    }

    #[test]
    fn test_sanitize_truncates_to_count() {
        let raw = json!([
            { "syllable": "MA", "letters": ["M", "A"], "hint": "M + A" },
            { "syllable": "ME", "letters": ["M", "E"], "hint": "M + E" },
            { "syllable": "MI", "letters": ["M", "I"], "hint": "M + I" }
        ])
        .to_string();

        assert_eq!(ExerciseService::sanitize(&raw, 2).len(), 2);
        assert!(ExerciseService::sanitize(&raw, 0).is_empty());
    }

    #[test]
    fn test_sanitize_rejects_non_json() {
        assert!(ExerciseService::sanitize("Aquí tienes: [..]", 5).is_empty());
        assert!(ExerciseService::sanitize("", 5).is_empty());
        assert!(ExerciseService::sanitize("{\"items\": []}", 5).is_empty());
    }

    struct Fixed(Result<&'static str, ()>);

    #[async_trait]
    impl CompletionClient for Fixed {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(CompletionError::Network("connection refused".to_string())),
            }
        }
    }

    fn service(reply: Result<&'static str, ()>) -> ExerciseService {
        ExerciseService::new(Arc::new(Fixed(reply)), "gpt-4o-mini".to_string())
    }

    #[tokio::test]
    async fn test_generate_uses_model_output() {
        let response = service(Ok(r#"[{"syllable":"PA","letters":["P","A"],"hint":"P + A"}]"#))
            .generate(5)
            .await;
        assert!(response.error.is_none());
        assert_eq!(response.exercises, vec![Exercise::new("P", "A")]);
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_garbage_without_marker() {
        let response = service(Ok("no sé")).generate(3).await;
        assert!(response.error.is_none());
        assert_eq!(response.exercises, fallback::exercises(3));
    }

    #[tokio::test]
    async fn test_generate_marks_upstream_failure() {
        let response = service(Err(())).generate(4).await;
        assert_eq!(response.error.as_deref(), Some("no_ai"));
        assert_eq!(response.exercises.len(), 4);
        assert!(response.exercises.iter().all(|e| e.letters.len() == 2));
    }
}
