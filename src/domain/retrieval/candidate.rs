//! Retrieved candidate operations

use std::collections::BTreeSet;

use crate::domain::catalog::ToolOperation;

/// A tool operation judged relevant enough to offer to the generator.
///
/// Lives only for the duration of one request; never persisted.
#[derive(Debug, Clone)]
pub struct RetrievedCandidate {
    pub operation: ToolOperation,
    /// Similarity score in [0, 1]
    pub score: f32,
    /// Zero-based rank in the original search result
    pub rank: usize,
}

/// The candidate set offered to the generator for one request
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<RetrievedCandidate>,
}

impl CandidateSet {
    pub fn new(candidates: Vec<RetrievedCandidate>) -> Self {
        Self { candidates }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RetrievedCandidate> {
        self.candidates.iter()
    }

    /// Distinct tool slugs across the candidate set, in stable order
    pub fn tool_slugs(&self) -> Vec<String> {
        let slugs: BTreeSet<&str> = self
            .candidates
            .iter()
            .map(|c| c.operation.tool_slug.as_str())
            .collect();

        slugs.into_iter().map(String::from).collect()
    }

    /// Distinct operation identifiers across the candidate set
    pub fn operation_ids(&self) -> Vec<String> {
        self.candidates
            .iter()
            .map(|c| c.operation.id.as_str().to_string())
            .collect()
    }

    /// Whether a tool slug belongs to the candidate set
    pub fn contains_tool(&self, tool_slug: &str) -> bool {
        self.candidates
            .iter()
            .any(|c| c.operation.tool_slug == tool_slug)
    }
}

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use crate::domain::catalog::{OperationId, OperationKind};

    /// Build a bare tool operation from an identifier, for tests
    pub fn operation(id: &str) -> ToolOperation {
        let operation_id = OperationId::new(id).unwrap();
        let tool = operation_id.tool_prefix().to_string();
        let op = operation_id.operation_slug().to_string();

        ToolOperation {
            id: operation_id,
            tool_slug: tool.clone(),
            tool_display_name: tool,
            operation_slug: op.clone(),
            operation_display_name: op,
            category: "general".into(),
            kind: OperationKind::Action,
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    /// Build a retrieved candidate from an identifier, for tests
    pub fn candidate(id: &str, score: f32, rank: usize) -> RetrievedCandidate {
        RetrievedCandidate {
            operation: operation(id),
            score,
            rank,
        }
    }
}
