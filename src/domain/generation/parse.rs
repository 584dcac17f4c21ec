//! Parsing of generator output into workflow documents

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::workflow::WorkflowDocument;
use crate::domain::DomainError;

static OPENING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json)?\n?").unwrap());
static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n?```$").unwrap());

/// Parse a generated response into a workflow document.
///
/// Generators occasionally wrap the JSON in markdown fences despite
/// instructions; those are stripped before parsing. Anything that still
/// fails to parse is a generation failure.
pub fn parse_document(response: &str) -> Result<WorkflowDocument, DomainError> {
    let trimmed = response.trim();

    let body = if trimmed.starts_with("```") {
        let without_opening = OPENING_FENCE.replace(trimmed, "");
        let without_closing = CLOSING_FENCE.replace(&without_opening, "");
        without_closing.trim().to_string()
    } else {
        trimmed.to_string()
    };

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        DomainError::generation_failure(format!(
            "Generator returned non-parseable document: {} (response: {})",
            e, preview
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"{"nodes": [{"id": "node1", "type": "gmail.send-email"}], "connections": {}}"#;

    #[test]
    fn test_parse_plain_json() {
        let document = parse_document(PLAIN).unwrap();

        assert_eq!(document.nodes.len(), 1);
        assert_eq!(document.nodes[0].node_type, "gmail.send-email");
    }

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        let response = format!("\n  {}  \n", PLAIN);

        assert!(parse_document(&response).is_ok());
    }

    #[test]
    fn test_parse_json_fence() {
        let response = format!("```json\n{}\n```", PLAIN);

        assert!(parse_document(&response).is_ok());
    }

    #[test]
    fn test_parse_anonymous_fence() {
        let response = format!("```\n{}\n```", PLAIN);

        assert!(parse_document(&response).is_ok());
    }

    #[test]
    fn test_non_json_is_generation_failure() {
        let result = parse_document("Sure! Here is your workflow:");

        assert!(matches!(result, Err(DomainError::GenerationFailure { .. })));
    }

    #[test]
    fn test_wrong_shape_is_generation_failure() {
        let result = parse_document(r#"{"steps": []}"#);

        assert!(matches!(result, Err(DomainError::GenerationFailure { .. })));
    }
}
