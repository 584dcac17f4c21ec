//! Pipeline outcome types

use serde::Serialize;

use crate::domain::retrieval::{ConfidenceLevel, Verdict};
use crate::domain::workflow::WorkflowDocument;

/// Result of one create-or-edit request.
///
/// `no_match` is a terminal verdict, not an error: the outcome carries a
/// clarification message and no workflow.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    pub conversation_id: String,
    pub workflow: Option<WorkflowDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub tools_used: Vec<String>,
    pub confidence_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WorkflowOutcome {
    /// Outcome for a retrieval that did not clear the low threshold
    pub fn no_match(conversation_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            workflow: None,
            version: None,
            tools_used: Vec::new(),
            confidence_score: 0.0,
            confidence_level: None,
            verdict: Verdict::NoMatch,
            message: Some(message.into()),
        }
    }
}
