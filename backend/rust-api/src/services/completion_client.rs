//! Text-completion client used by every endpoint.
//!
//! The gateway only needs "messages in, text out", so the upstream provider
//! sits behind [`CompletionClient`] and is injected into [`super::AppState`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_output_tokens: u32,
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl CompletionError {
    /// Short label for logs and metrics; prefers the provider's own error code.
    pub fn code(&self) -> &str {
        match self {
            CompletionError::NotConfigured(_) => "not_configured",
            CompletionError::Network(_) => "network_error",
            CompletionError::RateLimited => "rate_limited",
            CompletionError::Api {
                code: Some(code), ..
            } => code.as_str(),
            CompletionError::Api { .. } => "api_error",
            CompletionError::Decode(_) => "decode_error",
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the model's output text. An empty string is a valid answer.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// OpenAI Responses API client.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::NotConfigured(
                "OPENAI_API_KEY is empty".to_string(),
            ));
        }

        let body = ResponsesRequest {
            model: &request.model,
            input: &request.messages,
            max_output_tokens: request.max_output_tokens,
        };

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            max_output_tokens = request.max_output_tokens,
            "Sending request to OpenAI Responses API"
        );

        let response = self
            .client
            .post(self.responses_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(CompletionError::RateLimited);
            }

            let raw = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&raw)
                .ok()
                .and_then(|envelope| envelope.error);

            return Err(match detail {
                Some(detail) => CompletionError::Api {
                    status: status.as_u16(),
                    code: detail.code,
                    message: detail.message.unwrap_or(raw),
                },
                None => CompletionError::Api {
                    status: status.as_u16(),
                    code: None,
                    message: raw,
                },
            });
        }

        let parsed: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        Ok(parsed.output_text())
    }
}

// ============================================================================
// Responses API wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [ChatMessage],
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

impl ResponsesResponse {
    /// Concatenates every `output_text` part, like the official SDKs do.
    fn output_text(self) -> String {
        if let Some(text) = self.output_text {
            return text;
        }

        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hola")],
            max_output_tokens: 60,
        }
    }

    #[test]
    fn test_output_text_joins_output_parts() {
        let parsed: ResponsesResponse = serde_json::from_value(json!({
            "output": [
                { "type": "reasoning", "content": [] },
                { "type": "message", "content": [
                    { "type": "output_text", "text": "Junta " },
                    { "type": "refusal", "refusal": "no" },
                    { "type": "output_text", "text": "la M con la A" }
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(parsed.output_text(), "Junta la M con la A");
    }

    #[test]
    fn test_output_text_prefers_top_level_field() {
        let parsed: ResponsesResponse =
            serde_json::from_value(json!({ "output_text": "listo", "output": [] })).unwrap();
        assert_eq!(parsed.output_text(), "listo");
    }

    #[test]
    fn test_error_code_prefers_provider_code() {
        let err = CompletionError::Api {
            status: 401,
            code: Some("invalid_api_key".to_string()),
            message: "bad key".to_string(),
        };
        assert_eq!(err.code(), "invalid_api_key");
        assert_eq!(CompletionError::RateLimited.code(), "rate_limited");
    }

    #[tokio::test]
    async fn test_complete_posts_messages_and_reads_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_output_tokens": 60,
                "input": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hola" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output": [{ "type": "message", "content": [
                    { "type": "output_text", "text": "  ¡Muy bien!  " }
                ]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new("sk-test", format!("{}/v1/", server.uri()));
        let text = client.complete(&request()).await.unwrap();
        assert_eq!(text, "  ¡Muy bien!  ");
    }

    #[tokio::test]
    async fn test_complete_maps_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Incorrect API key", "code": "invalid_api_key" }
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("sk-wrong", server.uri());
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.code(), "invalid_api_key");
        assert!(matches!(err, CompletionError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_complete_maps_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("sk-test", server.uri());
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::RateLimited));
    }

    #[tokio::test]
    async fn test_complete_without_key_fails_fast() {
        let client = OpenAiClient::new("", "http://127.0.0.1:1");
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::NotConfigured(_)));
    }
}
