//! In-memory conversation store for development and testing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::conversation::{Conversation, ConversationStore, ConversationTurn};
use crate::domain::workflow::{WorkflowDocument, WorkflowVersion};
use crate::domain::DomainError;

/// In-memory implementation of ConversationStore.
///
/// Soft-deleted conversations stay in the map for audit but are invisible
/// to `load` and to mutations. Durable backends slot in behind the same
/// trait.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    records: Arc<RwLock<HashMap<String, ConversationRecord>>>,
}

#[derive(Debug, Clone)]
struct ConversationRecord {
    conversation: Conversation,
    versions: Vec<WorkflowVersion>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self) -> Result<Conversation, DomainError> {
        let conversation = Conversation::new(Uuid::new_v4().to_string(), Utc::now());

        let mut records = self.records.write().await;
        records.insert(
            conversation.id.clone(),
            ConversationRecord {
                conversation: conversation.clone(),
                versions: Vec::new(),
            },
        );

        Ok(conversation)
    }

    async fn load(&self, id: &str) -> Result<Option<Conversation>, DomainError> {
        let records = self.records.read().await;

        Ok(records
            .get(id)
            .filter(|record| !record.conversation.is_deleted)
            .map(|record| record.conversation.clone()))
    }

    async fn append_turn(&self, id: &str, turn: ConversationTurn) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let record = live_record(&mut records, id)?;

        record.conversation.turns.push(turn);
        record.conversation.updated_at = Utc::now();

        Ok(record.conversation.turns.len())
    }

    async fn replace_summary(&self, id: &str, summary: String) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        let record = live_record(&mut records, id)?;

        record.conversation.summary = Some(summary);
        record.conversation.updated_at = Utc::now();

        Ok(())
    }

    async fn save_workflow_version(
        &self,
        id: &str,
        document: WorkflowDocument,
    ) -> Result<WorkflowVersion, DomainError> {
        let mut records = self.records.write().await;
        let record = live_record(&mut records, id)?;

        let version = match record.versions.last() {
            Some(current) => current.successor(document, Utc::now()),
            None => WorkflowVersion::first(id, document, Utc::now()),
        };

        record.versions.push(version.clone());
        record.conversation.updated_at = Utc::now();

        Ok(version)
    }

    async fn current_workflow_version(
        &self,
        id: &str,
    ) -> Result<Option<WorkflowVersion>, DomainError> {
        let records = self.records.read().await;

        Ok(records
            .get(id)
            .filter(|record| !record.conversation.is_deleted)
            .and_then(|record| record.versions.last().cloned()))
    }

    async fn list_workflow_versions(&self, id: &str) -> Result<Vec<WorkflowVersion>, DomainError> {
        let records = self.records.read().await;

        Ok(records
            .get(id)
            .filter(|record| !record.conversation.is_deleted)
            .map(|record| record.versions.clone())
            .unwrap_or_default())
    }

    async fn soft_delete(&self, id: &str) -> Result<(), DomainError> {
        let mut records = self.records.write().await;

        if let Some(record) = records.get_mut(id) {
            record.conversation.is_deleted = true;
            record.conversation.updated_at = Utc::now();
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}

fn live_record<'a>(
    records: &'a mut HashMap<String, ConversationRecord>,
    id: &str,
) -> Result<&'a mut ConversationRecord, DomainError> {
    records
        .get_mut(id)
        .filter(|record| !record.conversation.is_deleted)
        .ok_or_else(|| DomainError::not_found(format!("Conversation '{}' not found", id)))
}
