//! Conversation persistence trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{Conversation, ConversationTurn};
use crate::domain::workflow::{WorkflowDocument, WorkflowVersion};
use crate::domain::DomainError;

/// Repository trait for conversations and their workflow version history.
///
/// `load` and every mutation treat soft-deleted conversations as absent;
/// the underlying data is retained for audit.
#[async_trait]
pub trait ConversationStore: Send + Sync + Debug {
    /// Create a new conversation with a generated id
    async fn create(&self) -> Result<Conversation, DomainError>;

    /// Load a conversation; `None` when absent or soft-deleted
    async fn load(&self, id: &str) -> Result<Option<Conversation>, DomainError>;

    /// Append a turn, returning the new turn count
    async fn append_turn(&self, id: &str, turn: ConversationTurn) -> Result<usize, DomainError>;

    /// Replace the rolling summary
    async fn replace_summary(&self, id: &str, summary: String) -> Result<(), DomainError>;

    /// Persist an accepted document as the next workflow version and move
    /// the current pointer to it
    async fn save_workflow_version(
        &self,
        id: &str,
        document: WorkflowDocument,
    ) -> Result<WorkflowVersion, DomainError>;

    /// The conversation's current workflow version, if any
    async fn current_workflow_version(
        &self,
        id: &str,
    ) -> Result<Option<WorkflowVersion>, DomainError>;

    /// All retained workflow versions, oldest first
    async fn list_workflow_versions(&self, id: &str) -> Result<Vec<WorkflowVersion>, DomainError>;

    /// Soft-delete a conversation; idempotent, deleting twice (or deleting
    /// an unknown id) is not an error
    async fn soft_delete(&self, id: &str) -> Result<(), DomainError>;

    /// Check that the store is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;
}

#[cfg(test)]
pub mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::conversation::TurnRole;
    use crate::domain::workflow::fixtures::single_node_document;

    /// Shared conformance suite for ConversationStore implementations
    pub async fn test_store_conversation_lifecycle<S: ConversationStore>(store: &S) {
        let conversation = store.create().await.expect("create should succeed");
        let id = conversation.id.clone();
        assert!(conversation.turns.is_empty());
        assert!(!conversation.is_deleted);

        // Load round-trips
        let loaded = store.load(&id).await.expect("load should succeed");
        assert!(loaded.is_some());

        // Append turns
        let count = store
            .append_turn(&id, ConversationTurn::new(TurnRole::User, "hello", Utc::now()))
            .await
            .expect("append should succeed");
        assert_eq!(count, 1);

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.turns.len(), 1);
        assert_eq!(loaded.turns[0].content, "hello");

        // Summary replacement
        store
            .replace_summary(&id, "summary one".into())
            .await
            .expect("replace_summary should succeed");
        store
            .replace_summary(&id, "summary two".into())
            .await
            .expect("replace_summary should succeed");
        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.summary.as_deref(), Some("summary two"));
    }

    /// Version numbers are strictly increasing, gapless, starting at 1
    pub async fn test_store_version_numbering<S: ConversationStore>(store: &S) {
        let id = store.create().await.unwrap().id;

        assert!(store.current_workflow_version(&id).await.unwrap().is_none());

        for expected in 1..=4u32 {
            let version = store
                .save_workflow_version(&id, single_node_document("gmail.send-email"))
                .await
                .expect("save should succeed");
            assert_eq!(version.version, expected);

            let current = store.current_workflow_version(&id).await.unwrap().unwrap();
            assert_eq!(current.version, expected);
        }

        let versions = store.list_workflow_versions(&id).await.unwrap();
        let numbers: Vec<u32> = versions.iter().map(|v| v.version).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    /// Soft delete hides the conversation and is idempotent
    pub async fn test_store_soft_delete<S: ConversationStore>(store: &S) {
        let id = store.create().await.unwrap().id;

        store.soft_delete(&id).await.expect("first delete should succeed");
        assert!(store.load(&id).await.unwrap().is_none());

        // Deleting twice is not an error
        store.soft_delete(&id).await.expect("second delete should succeed");

        // Neither is deleting an id that never existed
        store
            .soft_delete("00000000-0000-4000-8000-000000000000")
            .await
            .expect("unknown id delete should succeed");
    }

    /// Mutations against absent conversations fail with NotFound
    pub async fn test_store_missing_conversation<S: ConversationStore>(store: &S) {
        let turn = ConversationTurn::new(TurnRole::User, "hello", Utc::now());

        let result = store.append_turn("missing", turn).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let result = store
            .save_workflow_version("missing", single_node_document("gmail.send-email"))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
