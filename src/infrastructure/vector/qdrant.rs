//! Qdrant vector store implementation

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::domain::retrieval::{ScoredPoint, VectorSearch};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_QDRANT_BASE_URL: &str = "http://localhost:6333";

/// Qdrant REST client scoped to one collection
#[derive(Debug)]
pub struct QdrantVectorSearch<C: HttpClientTrait> {
    client: C,
    base_url: String,
    collection: String,
}

impl<C: HttpClientTrait> QdrantVectorSearch<C> {
    pub fn new(client: C, collection: impl Into<String>) -> Self {
        Self::with_base_url(client, collection, DEFAULT_QDRANT_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        collection: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/collections/{}/points/search", self.base_url, self.collection)
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorSearch for QdrantVectorSearch<C> {
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPoint>, DomainError> {
        let body = serde_json::json!({
            "vector": vector,
            "limit": top_k,
            "with_payload": true,
            "with_vector": false,
        });

        let response = self
            .client
            .post_json(&self.search_url(), vec![("Content-Type", "application/json")], &body)
            .await
            .map_err(|e| DomainError::retrieval_provider("qdrant", e.to_string()))?;

        let response: QdrantSearchResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::retrieval_provider("qdrant", format!("Failed to parse response: {}", e))
        })?;

        let points = response
            .result
            .into_iter()
            .filter_map(|hit| match hit.payload.and_then(|p| p.operation_id) {
                Some(operation_id) => Some(ScoredPoint::new(operation_id, hit.score)),
                None => {
                    warn!(point_id = ?hit.id, "Qdrant point without operation_id payload, skipping");
                    None
                }
            })
            .collect();

        Ok(points)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        match self.client.get_json(&self.collection_url(), Vec::new()).await {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    fn provider_name(&self) -> &'static str {
        "qdrant"
    }
}

#[derive(Debug, Deserialize)]
struct QdrantSearchResponse {
    result: Vec<QdrantHit>,
}

#[derive(Debug, Deserialize)]
struct QdrantHit {
    #[serde(default)]
    id: Option<serde_json::Value>,
    score: f32,
    payload: Option<QdrantPayload>,
}

#[derive(Debug, Deserialize)]
struct QdrantPayload {
    operation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const SEARCH_URL: &str = "http://localhost:6333/collections/tool_operations/points/search";
    const COLLECTION_URL: &str = "http://localhost:6333/collections/tool_operations";

    fn search_response() -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "time": 0.002,
            "result": [
                {"id": 1, "score": 0.85, "payload": {"operation_id": "gmail.send-email"}},
                {"id": 2, "score": 0.75, "payload": {"operation_id": "webhook.incoming"}},
                {"id": 3, "score": 0.40, "payload": {"operation_id": "slack.send-message"}}
            ]
        })
    }

    fn search(client: MockHttpClient) -> QdrantVectorSearch<MockHttpClient> {
        QdrantVectorSearch::new(client, "tool_operations")
    }

    #[tokio::test]
    async fn test_search_parses_ranked_points() {
        let client = MockHttpClient::new().with_response(SEARCH_URL, search_response());
        let search = search(client);

        let points = search.search(&[0.1, 0.2], 5).await.unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].operation_id, "gmail.send-email");
        assert_eq!(points[0].score, 0.85);
        assert_eq!(points[2].operation_id, "slack.send-message");
    }

    #[tokio::test]
    async fn test_search_sends_limit_and_payload_flags() {
        let client = MockHttpClient::new().with_response(SEARCH_URL, search_response());
        let search = QdrantVectorSearch::new(client, "tool_operations");

        search.search(&[0.1, 0.2], 5).await.unwrap();

        let requests = search.client.requests();
        assert_eq!(requests[0].1["limit"], 5);
        assert_eq!(requests[0].1["with_payload"], true);
        assert_eq!(requests[0].1["with_vector"], false);
    }

    #[tokio::test]
    async fn test_points_without_operation_id_are_skipped() {
        let response = serde_json::json!({
            "result": [
                {"id": 1, "score": 0.9, "payload": {"category": "email"}},
                {"id": 2, "score": 0.8, "payload": {"operation_id": "gmail.send-email"}},
                {"id": 3, "score": 0.7, "payload": null}
            ]
        });
        let client = MockHttpClient::new().with_response(SEARCH_URL, response);
        let search = search(client);

        let points = search.search(&[0.1], 5).await.unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].operation_id, "gmail.send-email");
    }

    #[tokio::test]
    async fn test_transport_error_carries_retrieval_kind() {
        let client = MockHttpClient::new().with_error(SEARCH_URL, "connection refused");
        let search = search(client);

        let result = search.search(&[0.1], 5).await;

        assert!(matches!(result, Err(DomainError::RetrievalProvider { .. })));
    }

    #[tokio::test]
    async fn test_health_check_reports_reachability() {
        let healthy_client = MockHttpClient::new()
            .with_response(COLLECTION_URL, serde_json::json!({"result": {"status": "green"}}));
        assert!(search(healthy_client).health_check().await.unwrap());

        let unhealthy_client = MockHttpClient::new().with_error(COLLECTION_URL, "refused");
        assert!(!search(unhealthy_client).health_check().await.unwrap());
    }
}
