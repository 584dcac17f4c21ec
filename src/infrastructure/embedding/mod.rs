//! Embedding provider implementations

mod voyage;

pub use voyage::VoyageEmbeddingProvider;
