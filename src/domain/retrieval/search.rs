//! Vector search collaborator trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// One entry of a ranked similarity search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    /// Operation identifier stored in the index payload
    pub operation_id: String,
    /// Cosine similarity score as reported by the store
    pub score: f32,
}

impl ScoredPoint {
    pub fn new(operation_id: impl Into<String>, score: f32) -> Self {
        Self {
            operation_id: operation_id.into(),
            score,
        }
    }
}

/// Trait for the external vector similarity store.
///
/// Index building and upserts are owned by a separate ingestion job; the
/// pipeline only searches.
#[async_trait]
pub trait VectorSearch: Send + Sync + Debug {
    /// Search the index, returning at most `top_k` entries ordered by
    /// descending similarity
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPoint>, DomainError>;

    /// Check that the store is reachable and the collection exists
    async fn health_check(&self) -> Result<bool, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
