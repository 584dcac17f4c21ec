//! Tool catalog entities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Regex pattern for valid slugs (lowercase alphanumeric + hyphens)
static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap());

/// Namespaced identifier of a tool operation, in the form `<tool>.<operation>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    /// Parse and validate an operation identifier
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();

        let Some((tool, operation)) = id.split_once('.') else {
            return Err(DomainError::validation(format!(
                "Invalid operation identifier '{}': expected '<tool>.<operation>'",
                id
            )));
        };

        if !SLUG_PATTERN.is_match(tool) || !SLUG_PATTERN.is_match(operation) {
            return Err(DomainError::validation(format!(
                "Invalid operation identifier '{}': segments must be lowercase slugs",
                id
            )));
        }

        Ok(Self(id))
    }

    /// Build an identifier from already-validated tool and operation slugs
    pub fn from_slugs(tool: &str, operation: &str) -> Result<Self, DomainError> {
        Self::new(format!("{}.{}", tool, operation))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tool segment before the namespace separator
    pub fn tool_prefix(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// The operation segment after the namespace separator
    pub fn operation_slug(&self) -> &str {
        self.0.split_once('.').map(|(_, op)| op).unwrap_or("")
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operation kind as declared in the catalog metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Trigger,
    #[default]
    Action,
}

/// One parameter accepted by a tool operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterField {
    pub name: String,
    #[serde(default = "default_field_type", rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_field_type() -> String {
    "string".to_string()
}

/// One addressable capability of an integration, the unit indexed for retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOperation {
    pub id: OperationId,
    pub tool_slug: String,
    pub tool_display_name: String,
    pub operation_slug: String,
    pub operation_display_name: String,
    pub category: String,
    pub kind: OperationKind,
    /// Descriptive text the retrieval index was built from
    pub description: String,
    pub parameters: Vec<ParameterField>,
}

impl ToolOperation {
    /// Names of parameters marked required
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Names of parameters not marked required
    pub fn optional_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| !p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Tool-level summary exposed by the catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    pub slug: String,
    pub display_name: String,
    pub description: String,
    pub category: String,
    pub auth_required: bool,
    pub operations: Vec<OperationSummary>,
}

/// Operation entry nested inside a tool summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSummary {
    pub slug: String,
    pub display_name: String,
    pub description: String,
    pub kind: OperationKind,
}
