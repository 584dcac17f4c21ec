//! Validation of generated documents against the candidate set

use serde::{Deserialize, Serialize};

use super::document::WorkflowDocument;
use crate::domain::retrieval::CandidateSet;

/// Configuration for result validation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Corrective regenerations allowed after a tool violation. The
    /// pipeline iterates `0..=max_corrective_attempts`, so the cap cannot
    /// be exceeded.
    #[serde(default = "default_max_corrective_attempts")]
    pub max_corrective_attempts: u8,
}

fn default_max_corrective_attempts() -> u8 {
    1
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_corrective_attempts: default_max_corrective_attempts(),
        }
    }
}

/// Checks that a generated document only references tools that were
/// actually offered to the generator.
///
/// The generator is statistically prone to emitting plausible but
/// unretrieved operations; every node's tool prefix must appear among the
/// candidate set's tool identifiers.
#[derive(Debug, Clone)]
pub struct ResultValidator {
    config: ValidatorConfig,
}

impl ResultValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Accept the document, or return the node types whose tool prefix is
    /// outside the candidate set
    pub fn check(
        &self,
        document: &WorkflowDocument,
        candidates: &CandidateSet,
    ) -> Result<(), Vec<String>> {
        let mut seen = std::collections::HashSet::new();
        let rejected: Vec<String> = document
            .nodes
            .iter()
            .filter(|node| !candidates.contains_tool(node.tool_prefix()))
            .map(|node| node.node_type.clone())
            .filter(|node_type| seen.insert(node_type.clone()))
            .collect();

        if rejected.is_empty() {
            Ok(())
        } else {
            Err(rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::super::document::fixtures::node;
    use super::*;
    use crate::domain::retrieval::fixtures::candidate;
    use crate::domain::workflow::WorkflowDocument;

    fn validator() -> ResultValidator {
        ResultValidator::new(ValidatorConfig::default())
    }

    #[test]
    fn test_accepts_document_inside_candidate_set() {
        let candidates = CandidateSet::new(vec![
            candidate("gmail.send-email", 0.85, 0),
            candidate("webhook.incoming", 0.75, 1),
        ]);
        let document = WorkflowDocument {
            nodes: vec![node("n1", "webhook.incoming"), node("n2", "gmail.send-email")],
            connections: HashMap::new(),
        };

        assert!(validator().check(&document, &candidates).is_ok());
    }

    #[test]
    fn test_rejects_tool_outside_candidate_set() {
        let candidates = CandidateSet::new(vec![candidate("slack.send-message", 0.8, 0)]);
        let document = WorkflowDocument {
            nodes: vec![node("n1", "teams.send-message")],
            connections: HashMap::new(),
        };

        let rejected = validator().check(&document, &candidates).unwrap_err();

        assert_eq!(rejected, vec!["teams.send-message"]);
    }

    #[test]
    fn test_sibling_operation_of_candidate_tool_is_accepted() {
        // The check is by tool prefix: offering gmail.send-email also
        // licenses other gmail operations.
        let candidates = CandidateSet::new(vec![candidate("gmail.send-email", 0.8, 0)]);
        let document = WorkflowDocument {
            nodes: vec![node("n1", "gmail.read-email")],
            connections: HashMap::new(),
        };

        assert!(validator().check(&document, &candidates).is_ok());
    }

    #[test]
    fn test_mixed_document_reports_only_violations() {
        let candidates = CandidateSet::new(vec![candidate("slack.send-message", 0.8, 0)]);
        let document = WorkflowDocument {
            nodes: vec![
                node("n1", "slack.send-message"),
                node("n2", "teams.send-message"),
                node("n3", "jira.create-issue"),
            ],
            connections: HashMap::new(),
        };

        let rejected = validator().check(&document, &candidates).unwrap_err();

        assert_eq!(rejected, vec!["teams.send-message", "jira.create-issue"]);
    }

    #[test]
    fn test_empty_candidate_set_rejects_everything() {
        let document = WorkflowDocument {
            nodes: vec![node("n1", "gmail.send-email")],
            connections: HashMap::new(),
        };

        assert!(validator().check(&document, &CandidateSet::empty()).is_err());
    }

    #[test]
    fn test_default_config_allows_single_corrective_attempt() {
        assert_eq!(validator().config().max_corrective_attempts, 1);
    }
}
