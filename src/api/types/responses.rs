//! Response types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::catalog::ToolSummary;
use crate::domain::conversation::{ConversationSnapshot, ConversationTurn};
use crate::domain::pipeline::WorkflowOutcome;
use crate::domain::retrieval::{ConfidenceLevel, Verdict};
use crate::domain::workflow::WorkflowDocument;

/// Response for workflow creation and editing
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResponse {
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

impl From<WorkflowOutcome> for WorkflowResponse {
    fn from(outcome: WorkflowOutcome) -> Self {
        Self {
            conversation_id: outcome.conversation_id,
            workflow: outcome.workflow,
            version: outcome.version,
            tools_used: outcome.tools_used,
            confidence_score: outcome.confidence_score,
            confidence_level: outcome.confidence_level,
            verdict: outcome.verdict,
            message: outcome.message,
        }
    }
}

/// Response for conversation retrieval
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub messages: Vec<ConversationTurn>,
    pub summary: Option<String>,
    pub message_count: usize,
    pub workflow: Option<WorkflowDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_version: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl From<ConversationSnapshot> for ConversationResponse {
    fn from(snapshot: ConversationSnapshot) -> Self {
        let (workflow, workflow_version) = match snapshot.current_version {
            Some(version) => (Some(version.document), Some(version.version)),
            None => (None, None),
        };

        Self {
            conversation_id: snapshot.conversation_id,
            messages: snapshot.recent_turns,
            summary: snapshot.summary,
            message_count: snapshot.total_turns,
            workflow,
            workflow_version,
            created_at: snapshot.created_at,
        }
    }
}

/// Response for conversation deletion
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Response for the catalog listing
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub tools: Vec<ToolSummary>,
    pub total_count: usize,
}
