//! Static catalog index built once at startup

use std::collections::HashMap;

use serde::Deserialize;

use super::entity::{
    OperationId, OperationKind, OperationSummary, ParameterField, ToolOperation, ToolSummary,
};
use crate::domain::DomainError;

/// Registry of every tool operation known to the system.
///
/// Built from the catalog metadata file at startup and never mutated
/// afterwards. The vector index over the same operations is maintained by a
/// separate ingestion job; this index is the authority the pipeline resolves
/// retrieved identifiers against.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    operations: HashMap<OperationId, ToolOperation>,
    tools: Vec<ToolSummary>,
}

impl CatalogIndex {
    /// Parse the catalog from the raw metadata JSON (array of tools with
    /// nested operations)
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let tools: Vec<ToolMetadata> = serde_json::from_str(raw)
            .map_err(|e| DomainError::configuration(format!("Invalid catalog JSON: {}", e)))?;

        Self::from_metadata(tools)
    }

    fn from_metadata(tools: Vec<ToolMetadata>) -> Result<Self, DomainError> {
        let mut operations = HashMap::new();
        let mut summaries = Vec::with_capacity(tools.len());

        for tool in tools {
            let mut operation_summaries = Vec::with_capacity(tool.operations.len());

            for op in tool.operations {
                let id = OperationId::from_slugs(&tool.slug, &op.slug)?;

                operation_summaries.push(OperationSummary {
                    slug: op.slug.clone(),
                    display_name: op.display_name.clone(),
                    description: op.description.clone(),
                    kind: op.operation_type,
                });

                let operation = ToolOperation {
                    id: id.clone(),
                    tool_slug: tool.slug.clone(),
                    tool_display_name: tool.display_name.clone(),
                    operation_slug: op.slug,
                    operation_display_name: op.display_name,
                    category: tool.category.clone(),
                    kind: op.operation_type,
                    description: op.description,
                    parameters: op.input_schema,
                };

                if operations.insert(id.clone(), operation).is_some() {
                    return Err(DomainError::configuration(format!(
                        "Duplicate operation '{}' in catalog",
                        id
                    )));
                }
            }

            summaries.push(ToolSummary {
                slug: tool.slug,
                display_name: tool.display_name,
                description: tool.description,
                category: tool.category,
                auth_required: tool.auth_config.map(|a| a.auth_type != "none").unwrap_or(true),
                operations: operation_summaries,
            });
        }

        Ok(Self {
            operations,
            tools: summaries,
        })
    }

    /// Look up an operation by its namespaced identifier
    pub fn get(&self, id: &OperationId) -> Option<&ToolOperation> {
        self.operations.get(id)
    }

    /// Resolve a raw identifier string against the catalog
    pub fn resolve(&self, raw: &str) -> Option<&ToolOperation> {
        let id = OperationId::new(raw).ok()?;
        self.operations.get(&id)
    }

    /// All tools with their nested operations, for the catalog listing
    pub fn tools(&self) -> &[ToolSummary] {
        &self.tools
    }

    /// Distinct tool categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        let set: std::collections::BTreeSet<&str> =
            self.tools.iter().map(|t| t.category.as_str()).collect();
        set.into_iter().collect()
    }

    /// Number of indexed operations
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

// Wire shape of the catalog metadata file (camelCase, as produced by the
// catalog export).

#[derive(Debug, Deserialize)]
struct ToolMetadata {
    slug: String,
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(rename = "authConfig")]
    auth_config: Option<AuthConfig>,
    #[serde(default)]
    operations: Vec<OperationMetadata>,
}

#[derive(Debug, Deserialize)]
struct AuthConfig {
    #[serde(rename = "type")]
    auth_type: String,
}

#[derive(Debug, Deserialize)]
struct OperationMetadata {
    slug: String,
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "operationType", default)]
    operation_type: OperationKind,
    #[serde(rename = "inputSchema", default)]
    input_schema: Vec<ParameterField>,
}

fn default_category() -> String {
    "general".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"[
        {
            "slug": "gmail",
            "displayName": "Gmail",
            "description": "Send and manage emails",
            "category": "email",
            "authConfig": {"type": "oauth2"},
            "operations": [
                {
                    "slug": "send-email",
                    "displayName": "Send Email",
                    "description": "Send an email to one or more recipients",
                    "operationType": "action",
                    "inputSchema": [
                        {"name": "to", "type": "string", "required": true},
                        {"name": "subject", "type": "string", "required": true},
                        {"name": "cc", "type": "string", "required": false}
                    ]
                }
            ]
        },
        {
            "slug": "webhook",
            "displayName": "Webhook",
            "description": "Receive HTTP callbacks",
            "category": "developer-tools",
            "authConfig": {"type": "none"},
            "operations": [
                {
                    "slug": "incoming",
                    "displayName": "Incoming Webhook",
                    "description": "Trigger a workflow from an HTTP request",
                    "operationType": "trigger"
                }
            ]
        }
    ]"#;

    #[test]
    fn test_catalog_from_json() {
        let catalog = CatalogIndex::from_json(CATALOG_JSON).unwrap();

        assert_eq!(catalog.operation_count(), 2);
        assert_eq!(catalog.tools().len(), 2);

        let op = catalog.resolve("gmail.send-email").unwrap();
        assert_eq!(op.tool_display_name, "Gmail");
        assert_eq!(op.category, "email");
        assert_eq!(op.required_parameters(), vec!["to", "subject"]);
    }

    #[test]
    fn test_auth_required_flag() {
        let catalog = CatalogIndex::from_json(CATALOG_JSON).unwrap();

        let gmail = catalog.tools().iter().find(|t| t.slug == "gmail").unwrap();
        let webhook = catalog.tools().iter().find(|t| t.slug == "webhook").unwrap();

        assert!(gmail.auth_required);
        assert!(!webhook.auth_required);
    }

    #[test]
    fn test_resolve_unknown_identifier() {
        let catalog = CatalogIndex::from_json(CATALOG_JSON).unwrap();

        assert!(catalog.resolve("teams.send-message").is_none());
        assert!(catalog.resolve("not-namespaced").is_none());
    }

    #[test]
    fn test_duplicate_operation_rejected() {
        let raw = r#"[
            {
                "slug": "gmail",
                "displayName": "Gmail",
                "operations": [
                    {"slug": "send-email", "displayName": "Send Email"},
                    {"slug": "send-email", "displayName": "Send Email Again"}
                ]
            }
        ]"#;

        let result = CatalogIndex::from_json(raw);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        let result = CatalogIndex::from_json("not json");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
