//! Configuration loading

mod app_config;

pub use app_config::{
    AnthropicConfig, AppConfig, CatalogConfig, GenerationConfig, LogFormat, LoggingConfig,
    ProvidersConfig, QdrantConfig, ServerConfig, VoyageConfig,
};
