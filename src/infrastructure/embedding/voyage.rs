//! Voyage AI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_VOYAGE_BASE_URL: &str = "https://api.voyageai.com";

/// Maximum query length accepted for embedding
const MAX_INPUT_CHARS: usize = 8000;

/// Voyage AI embedding provider
#[derive(Debug)]
pub struct VoyageEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl<C: HttpClientTrait> VoyageEmbeddingProvider<C> {
    pub fn new(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self::with_base_url(client, api_key, model, dimensions, DEFAULT_VOYAGE_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimensions,
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for VoyageEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::validation("Text to embed cannot be empty"));
        }
        if text.len() > MAX_INPUT_CHARS {
            return Err(DomainError::validation(format!(
                "Text too long: {} characters (max {})",
                text.len(),
                MAX_INPUT_CHARS
            )));
        }

        let body = serde_json::json!({
            "input": [text],
            "model": self.model,
            "input_type": "query",
        });

        let response = self
            .client
            .post_json(&self.embeddings_url(), self.headers(), &body)
            .await
            .map_err(|e| DomainError::embedding_provider("voyage", e.to_string()))?;

        let response: VoyageEmbeddingResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::embedding_provider("voyage", format!("Failed to parse response: {}", e))
        })?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::embedding_provider("voyage", "Empty embedding response"))?;

        if embedding.len() != self.dimensions {
            return Err(DomainError::embedding_provider(
                "voyage",
                format!(
                    "Invalid embedding dimension: {} (expected {})",
                    embedding.len(),
                    self.dimensions
                ),
            ));
        }

        Ok(embedding)
    }

    fn provider_name(&self) -> &'static str {
        "voyage"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Debug, Deserialize)]
struct VoyageEmbeddingResponse {
    data: Vec<VoyageEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct VoyageEmbeddingData {
    embedding: Vec<f32>,
}
