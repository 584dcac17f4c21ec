//! Flowgen
//!
//! Turns natural-language requests into structured automation-workflow
//! documents by combining:
//! - conversational memory with rolling summarization
//! - semantic retrieval over a catalog of tool operations
//! - an external text-generation model, validated against the retrieved
//!   candidate set with a single bounded corrective retry

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use api::AppState;
use domain::conversation::ConversationState;
use domain::pipeline::WorkflowPipeline;
use domain::DomainError;
use infrastructure::catalog::load_catalog;
use infrastructure::conversation::InMemoryConversationStore;
use infrastructure::embedding::VoyageEmbeddingProvider;
use infrastructure::generation::AnthropicGenerator;
use infrastructure::http_client::HttpClient;
use infrastructure::vector::QdrantVectorSearch;

/// Wire the application state from configuration: catalog, collaborator
/// providers, conversation state, and the pipeline.
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let catalog = Arc::new(load_catalog(Path::new(&config.catalog.path))?);

    let timeout = Duration::from_secs(config.providers.timeout_secs);
    let http = HttpClient::with_timeout(timeout)?;

    let embedding = Arc::new(VoyageEmbeddingProvider::with_base_url(
        http.clone(),
        config.providers.voyage.api_key.clone(),
        config.providers.voyage.model.clone(),
        config.providers.voyage.dimensions,
        config.providers.voyage.base_url.clone(),
    ));

    let search = Arc::new(QdrantVectorSearch::with_base_url(
        http.clone(),
        config.providers.qdrant.collection.clone(),
        config.providers.qdrant.base_url.clone(),
    ));

    let generator = Arc::new(AnthropicGenerator::with_base_url(
        http,
        config.providers.anthropic.api_key.clone(),
        config.generation.model.clone(),
        config.providers.anthropic.base_url.clone(),
    ));

    let store = Arc::new(InMemoryConversationStore::new());
    let state = Arc::new(ConversationState::new(
        store,
        generator.clone(),
        config.conversation,
    ));

    let pipeline = Arc::new(WorkflowPipeline::new(
        catalog,
        embedding,
        search,
        generator,
        state,
        config.retrieval.clone(),
        config.generation.planner,
        config.generation.validator,
    ));

    let generator_configured = !config.providers.anthropic.api_key.is_empty();

    Ok(AppState::new(pipeline, generator_configured))
}
