//! Anthropic Messages API generator implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::generation::{CompletionRequest, TextGenerator};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API text generator
#[derive(Debug)]
pub struct AnthropicGenerator<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> AnthropicGenerator<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{"role": "user", "content": request.prompt}],
        });

        if let Some(ref system) = request.system {
            body["system"] = serde_json::json!(system);
        }

        body
    }
}

#[async_trait]
impl<C: HttpClientTrait> TextGenerator for AnthropicGenerator<C> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, DomainError> {
        let body = self.build_body(&request);

        let response = self
            .client
            .post_json(&self.messages_url(), self.headers(), &body)
            .await
            .map_err(|e| DomainError::generation_failure(e.to_string()))?;

        let response: AnthropicResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::generation_failure(format!("Failed to parse response: {}", e))
        })?;

        let text = response
            .content
            .into_iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(DomainError::generation_failure("Empty response from generator"));
        }

        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.anthropic.com/v1/messages";

    fn text_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "msg_01",
            "model": "claude-sonnet-4-20250514",
            "content": [{"type": "text", "text": text}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 100, "output_tokens": 50}
        })
    }

    fn generator(client: MockHttpClient) -> AnthropicGenerator<MockHttpClient> {
        AnthropicGenerator::new(client, "test-key", "claude-sonnet-4-20250514")
    }

    #[tokio::test]
    async fn test_complete_returns_text() {
        let client = MockHttpClient::new().with_response(TEST_URL, text_response("{\"nodes\": []}"));
        let generator = generator(client);

        let text = generator.complete(CompletionRequest::new("prompt")).await.unwrap();

        assert_eq!(text, "{\"nodes\": []}");
    }

    #[tokio::test]
    async fn test_complete_sends_system_and_sampling() {
        let client = MockHttpClient::new().with_response(TEST_URL, text_response("ok"));
        let generator = AnthropicGenerator::new(client, "test-key", "claude-sonnet-4-20250514");

        let request = CompletionRequest::new("the prompt")
            .with_system("the system")
            .with_max_tokens(2000)
            .with_temperature(0.2);
        generator.complete(request).await.unwrap();

        let requests = generator.client.requests();
        let body = &requests[0].1;
        assert_eq!(body["system"], "the system");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "the prompt");
    }

    #[tokio::test]
    async fn test_multiple_text_blocks_are_joined() {
        let response = serde_json::json!({
            "content": [
                {"type": "text", "text": "{\"nodes\""},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": ": []}"}
            ]
        });
        let client = MockHttpClient::new().with_response(TEST_URL, response);
        let generator = generator(client);

        let text = generator.complete(CompletionRequest::new("prompt")).await.unwrap();

        assert_eq!(text, "{\"nodes\": []}");
    }

    #[tokio::test]
    async fn test_empty_content_is_generation_failure() {
        let client =
            MockHttpClient::new().with_response(TEST_URL, serde_json::json!({"content": []}));
        let generator = generator(client);

        let result = generator.complete(CompletionRequest::new("prompt")).await;

        assert!(matches!(result, Err(DomainError::GenerationFailure { .. })));
    }

    #[tokio::test]
    async fn test_transport_error_carries_generation_kind() {
        let client = MockHttpClient::new().with_error(TEST_URL, "529 overloaded");
        let generator = generator(client);

        let result = generator.complete(CompletionRequest::new("prompt")).await;

        assert!(matches!(result, Err(DomainError::GenerationFailure { .. })));
    }
}
