pub mod prompt;
pub mod types;

pub use prompt::build_prompt;

use crate::config::{AnthropicSettings, Secret};
use crate::http::{self, body_suffix};
use crate::pr::PrContext;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use types::{Message, MessagesRequest, MessagesResponse};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Anthropic API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Anthropic API error: {status}{}", body_suffix(.body))]
    Status { status: StatusCode, body: String },

    #[error("Invalid response format from Anthropic API")]
    InvalidResponse,
}

/// Turns a [`PrContext`] into a Markdown PR body through the Anthropic Messages API.
pub struct DescriptionGenerator {
    client: Client,
    endpoint: String,
    api_key: Secret,
    model: String,
    max_tokens: u32,
}

impl DescriptionGenerator {
    pub fn new(settings: &AnthropicSettings, api_key: Secret) -> Result<Self, GenerateError> {
        Ok(Self {
            client: http::client(settings.timeout_secs)?,
            endpoint: format!("{}/v1/messages", settings.base_url.trim_end_matches('/')),
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
        })
    }

    /// Send one generation request for `ctx` and return the trimmed description.
    #[instrument(skip(self, ctx), fields(model = %self.model, max_tokens = self.max_tokens))]
    pub async fn generate(&self, ctx: &PrContext) -> Result<String, GenerateError> {
        let prompt = build_prompt(ctx);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };
        debug!(prompt_bytes = prompt.len(), "sending generation request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "received generation response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "generation response is not valid JSON");
            GenerateError::InvalidResponse
        })?;

        if parsed.stop_reason.as_deref() == Some("max_tokens") {
            warn!("description was cut off by the max_tokens limit");
        }

        parsed
            .first_text()
            .map(str::to_string)
            .ok_or(GenerateError::InvalidResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_context() -> PrContext {
        PrContext {
            title: "Fix bug".to_string(),
            author: "alice".to_string(),
            commits: "abc123 Fix bug".to_string(),
            diff: "--- a/x\n+++ b/x".to_string(),
        }
    }

    fn generator_for(server: &MockServer) -> DescriptionGenerator {
        let settings = AnthropicSettings {
            model: "claude-test".to_string(),
            max_tokens: 321,
            base_url: server.uri(),
            timeout_secs: 5,
        };
        DescriptionGenerator::new(&settings, Secret::from("sk-ant-test")).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "model": "claude-test",
                "max_tokens": 321,
                "messages": [{ "role": "user" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "  ## Summary\nFixes the bug.\n" }],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let description = generator_for(&server)
            .generate(&test_context())
            .await
            .unwrap();
        assert_eq!(description, "## Summary\nFixes the bug.");
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_with_context() {
        let server = MockServer::start().await;
        let ctx = test_context();
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "messages": [{ "role": "user", "content": build_prompt(&ctx) }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "ok" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(generator_for(&server).generate(&ctx).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_generate_server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = generator_for(&server)
            .generate(&test_context())
            .await
            .unwrap_err();
        match &err {
            GenerateError::Status { status, body } => {
                assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected Status, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Anthropic API error: 500 Internal Server Error: overloaded"
        );
    }

    #[tokio::test]
    async fn test_generate_keeps_text_cut_off_by_max_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "## Summary\nFixes the" }],
                "stop_reason": "max_tokens"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let description = generator_for(&server)
            .generate(&test_context())
            .await
            .unwrap();
        assert_eq!(description, "## Summary\nFixes the");
    }

    #[tokio::test]
    async fn test_generate_missing_content_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_01" })))
            .mount(&server)
            .await;

        let err = generator_for(&server)
            .generate(&test_context())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidResponse));
    }

    #[tokio::test]
    async fn test_generate_non_json_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let err = generator_for(&server)
            .generate(&test_context())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidResponse));
    }

    #[tokio::test]
    async fn test_generate_unreachable_endpoint_is_transport_error() {
        let settings = AnthropicSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 5,
            ..AnthropicSettings::default()
        };
        let generator = DescriptionGenerator::new(&settings, Secret::from("sk-ant-test")).unwrap();

        let err = generator.generate(&test_context()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Transport(_)));
    }
}
