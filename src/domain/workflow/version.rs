//! Versioned workflow documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::WorkflowDocument;

/// An accepted workflow document pinned to a conversation.
///
/// Immutable once superseded; edits always produce a new version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowVersion {
    pub conversation_id: String,
    pub document: WorkflowDocument,
    /// Monotonically increasing, starting at 1
    pub version: u32,
    pub created_at: DateTime<Utc>,
}

impl WorkflowVersion {
    pub fn first(
        conversation_id: impl Into<String>,
        document: WorkflowDocument,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            document,
            version: 1,
            created_at,
        }
    }

    /// Build the successor of this version with a new document
    pub fn successor(&self, document: WorkflowDocument, created_at: DateTime<Utc>) -> Self {
        Self {
            conversation_id: self.conversation_id.clone(),
            document,
            version: self.version + 1,
            created_at,
        }
    }
}
