//! Text generation collaborator trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// A single completion request to the text-generation collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: 4000,
            temperature: 0.3,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }
}

/// Trait for text generators (Anthropic, Bedrock, etc.).
///
/// Returns raw text; parsing and validation of generated documents belong
/// to the core, not the provider.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Run one completion and return the generated text
    async fn complete(&self, request: CompletionRequest) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
