//! Application configuration

use serde::Deserialize;

use crate::domain::conversation::ConversationConfig;
use crate::domain::generation::PlannerConfig;
use crate::domain::retrieval::RetrievalConfig;
use crate::domain::workflow::ValidatorConfig;

/// Top-level application configuration.
///
/// Loaded from `config/default` and `config/local` files plus `APP_*`
/// environment variables (`__` separates nesting levels). Thresholds and
/// retry caps live here and are handed to the pipeline components at
/// construction; nothing reads them from ambient process state afterwards.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Path to the tool metadata JSON file
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "data/tools_metadata.json".to_string(),
        }
    }
}

/// Generation settings: sampling for the planner, retry cap for the
/// validator, and the model the generator provider targets
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub validator: ValidatorConfig,
    #[serde(default = "default_generation_model")]
    pub model: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            validator: ValidatorConfig::default(),
            model: default_generation_model(),
        }
    }
}

fn default_generation_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub voyage: VoyageConfig,
    #[serde(default)]
    pub qdrant: QdrantConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    /// Bounded timeout applied to every collaborator call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            voyage: VoyageConfig::default(),
            qdrant: QdrantConfig::default(),
            anthropic: AnthropicConfig::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoyageConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dimensions: usize,
}

impl Default for VoyageConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.voyageai.com".to_string(),
            model: "voyage-code-3".to_string(),
            dimensions: 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QdrantConfig {
    pub base_url: String,
    pub collection: String,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6333".to_string(),
            collection: "tool_operations".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.anthropic.com".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Fail fast when credentials required at runtime are missing
    pub fn validate_credentials(&self) -> Result<(), crate::domain::DomainError> {
        let mut missing = Vec::new();

        if self.providers.voyage.api_key.is_empty() {
            missing.push("APP_PROVIDERS__VOYAGE__API_KEY");
        }
        if self.providers.anthropic.api_key.is_empty() {
            missing.push("APP_PROVIDERS__ANTHROPIC__API_KEY");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(crate::domain::DomainError::configuration(format!(
                "Missing critical environment variables: {}",
                missing.join(", ")
            )))
        }
    }
}
