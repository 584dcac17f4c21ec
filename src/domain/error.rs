use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Embedding provider error: {provider} - {message}")]
    EmbeddingProvider { provider: String, message: String },

    #[error("Retrieval provider error: {provider} - {message}")]
    RetrievalProvider { provider: String, message: String },

    #[error("Generation failure: {message}")]
    GenerationFailure { message: String },

    #[error("Generated workflow references tools outside the candidate set: {}", rejected.join(", "))]
    ToolHallucination { rejected: Vec<String> },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn embedding_provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingProvider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn retrieval_provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RetrievalProvider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn generation_failure(message: impl Into<String>) -> Self {
        Self::GenerationFailure {
            message: message.into(),
        }
    }

    pub fn tool_hallucination(rejected: Vec<String>) -> Self {
        Self::ToolHallucination { rejected }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
