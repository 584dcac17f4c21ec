//! Conversation state service: history, summarization, versioning, locking

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use super::entity::{Conversation, ConversationTurn, TurnRole};
use super::store::ConversationStore;
use crate::domain::generation::{CompletionRequest, TextGenerator};
use crate::domain::workflow::{WorkflowDocument, WorkflowVersion};
use crate::domain::DomainError;

/// Summarization and retention policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Turn count above which older turns are folded into the summary
    #[serde(default = "default_retention_window")]
    pub retention_window: usize,
    /// Most recent turns always kept verbatim
    #[serde(default = "default_keep_recent")]
    pub keep_recent: usize,
}

fn default_retention_window() -> usize {
    10
}

fn default_keep_recent() -> usize {
    5
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            retention_window: default_retention_window(),
            keep_recent: default_keep_recent(),
        }
    }
}

const SUMMARY_MAX_TOKENS: u32 = 500;

/// Read model of a conversation: the kept verbatim window plus summary
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSnapshot {
    pub conversation_id: String,
    pub recent_turns: Vec<ConversationTurn>,
    pub summary: Option<String>,
    pub total_turns: usize,
    pub current_version: Option<WorkflowVersion>,
    pub created_at: DateTime<Utc>,
}

/// Owns conversation history and the workflow version chain.
///
/// Exposes the per-conversation exclusive section the pipeline must hold
/// across its read-current/validate/write-new sequence; requests against
/// different conversation ids run in parallel.
#[derive(Debug)]
pub struct ConversationState {
    store: Arc<dyn ConversationStore>,
    summarizer: Arc<dyn TextGenerator>,
    config: ConversationConfig,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationState {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        summarizer: Arc<dyn TextGenerator>,
        config: ConversationConfig,
    ) -> Self {
        Self {
            store,
            summarizer,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// Acquire the exclusive section for one conversation id.
    ///
    /// Lock entries are created on demand and kept for the process
    /// lifetime, bounded by the number of distinct conversations served.
    pub async fn guard(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(id.to_string()).or_default().clone()
        };

        lock.lock_owned().await
    }

    /// Load an existing conversation or create a new one when no id is given
    pub async fn get_or_create(&self, id: Option<&str>) -> Result<Conversation, DomainError> {
        match id {
            Some(id) => self.load_required(id).await,
            None => {
                let conversation = self.store.create().await?;
                debug!(conversation_id = %conversation.id, "Created new conversation");
                Ok(conversation)
            }
        }
    }

    /// Load a conversation, failing with NotFound when absent or deleted
    pub async fn load_required(&self, id: &str) -> Result<Conversation, DomainError> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Conversation '{}' not found", id)))
    }

    /// Append a turn; summarization of aged-out turns runs as a side
    /// effect once the retention window is exceeded
    pub async fn record_turn(
        &self,
        id: &str,
        role: TurnRole,
        content: impl Into<String>,
    ) -> Result<(), DomainError> {
        let turn = ConversationTurn::new(role, content, Utc::now());
        let total = self.store.append_turn(id, turn).await?;

        if total > self.config.retention_window {
            self.resummarize(id).await?;
        }

        Ok(())
    }

    /// Persist an accepted document as the next workflow version
    pub async fn accept_document(
        &self,
        id: &str,
        document: WorkflowDocument,
    ) -> Result<WorkflowVersion, DomainError> {
        self.store.save_workflow_version(id, document).await
    }

    pub async fn current_version(&self, id: &str) -> Result<Option<WorkflowVersion>, DomainError> {
        self.store.current_workflow_version(id).await
    }

    /// The kept verbatim window, summary, and current version
    pub async fn snapshot(&self, id: &str) -> Result<ConversationSnapshot, DomainError> {
        let conversation = self.load_required(id).await?;
        let current_version = self.store.current_workflow_version(id).await?;

        Ok(ConversationSnapshot {
            conversation_id: conversation.id.clone(),
            recent_turns: conversation.recent_turns(self.config.keep_recent).to_vec(),
            summary: conversation.summary.clone(),
            total_turns: conversation.turn_count(),
            current_version,
            created_at: conversation.created_at,
        })
    }

    /// Soft-delete; idempotent
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.store.soft_delete(id).await
    }

    pub async fn health_check(&self) -> Result<bool, DomainError> {
        self.store.health_check().await
    }

    /// Recompute the rolling summary over everything before the kept
    /// window, replacing the previous summary. A summarization failure is
    /// logged and skipped; it never fails the append that triggered it.
    async fn resummarize(&self, id: &str) -> Result<(), DomainError> {
        let conversation = self.load_required(id).await?;

        let split = conversation.turns.len().saturating_sub(self.config.keep_recent);
        let aged = &conversation.turns[..split];
        if aged.is_empty() {
            return Ok(());
        }

        match self.summarize(aged).await {
            Ok(summary) if !summary.is_empty() => {
                self.store.replace_summary(id, summary).await?;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(conversation_id = %id, error = %e, "Summarization failed, keeping previous summary");
            }
        }

        Ok(())
    }

    async fn summarize(&self, turns: &[ConversationTurn]) -> Result<String, DomainError> {
        let mut transcript = String::new();
        for turn in turns {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "assistant",
            };
            let _ = writeln!(transcript, "{}: {}", role, turn.content);
        }

        let prompt = format!(
            "Summarize this conversation in 2-3 sentences.\n\
             Focus on: the user's goal, tools discussed, key decisions made.\n\n\
             Conversation:\n{}\n\nSummary:",
            transcript.trim_end(),
        );

        let request = CompletionRequest::new(prompt).with_max_tokens(SUMMARY_MAX_TOKENS);
        let summary = self.summarizer.complete(request).await?;

        Ok(summary.trim().to_string())
    }
}
