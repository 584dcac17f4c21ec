//! Request types and validation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::DomainError;

/// Longest accepted creation query
const MAX_QUERY_LENGTH: usize = 1000;
/// Longest accepted edit instruction
const MAX_INSTRUCTION_LENGTH: usize = 500;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Request to create a workflow or continue a conversation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflowRequest {
    pub query: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl CreateWorkflowRequest {
    /// Validate and normalize the request, returning the sanitized query
    pub fn validated_query(&self) -> Result<String, DomainError> {
        if let Some(ref id) = self.conversation_id {
            validate_conversation_id(id)?;
        }

        sanitize_text(&self.query, "query", MAX_QUERY_LENGTH)
    }
}

/// Request to edit the current workflow of a conversation
#[derive(Debug, Clone, Deserialize)]
pub struct EditWorkflowRequest {
    pub conversation_id: String,
    pub edit_instruction: String,
}

impl EditWorkflowRequest {
    /// Validate and normalize the request, returning the sanitized
    /// instruction
    pub fn validated_instruction(&self) -> Result<String, DomainError> {
        validate_conversation_id(&self.conversation_id)?;
        sanitize_text(&self.edit_instruction, "edit_instruction", MAX_INSTRUCTION_LENGTH)
    }
}

/// Reject ids that are not UUIDs before they reach the store
pub fn validate_conversation_id(id: &str) -> Result<(), DomainError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| DomainError::validation(format!("Invalid conversation_id '{}': must be a UUID", id)))
}

/// Trim, collapse whitespace runs, strip control characters, and enforce
/// length limits. Collapsing runs first so tabs and newlines become
/// single spaces instead of being stripped outright.
fn sanitize_text(raw: &str, field: &str, max_length: usize) -> Result<String, DomainError> {
    let collapsed = WHITESPACE_RUN.replace_all(raw.trim(), " ");
    let cleaned: String = collapsed.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim().to_string();

    if cleaned.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field)));
    }

    if cleaned.len() > max_length {
        return Err(DomainError::validation(format!(
            "{} too long: {} characters (max {})",
            field,
            cleaned.len(),
            max_length
        )));
    }

    Ok(cleaned)
}
