//! The retrieval-and-generation orchestration pipeline

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::outcome::WorkflowOutcome;
use crate::domain::catalog::{CatalogIndex, ToolOperation};
use crate::domain::conversation::{ConversationSnapshot, ConversationState, TurnRole};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::generation::{
    parse_document, GenerationMode, GenerationPlanner, PlannerConfig, TextGenerator,
};
use crate::domain::retrieval::{
    compose_query, CandidateSet, RetrievalClassifier, RetrievalConfig, ScoredPoint, VectorSearch,
};
use crate::domain::workflow::{ResultValidator, ValidatorConfig, WorkflowDocument};
use crate::domain::DomainError;

const CREATE_ACCEPTED_NOTE: &str = "Generated workflow successfully";
const EDIT_ACCEPTED_NOTE: &str = "Updated workflow successfully";

/// Orchestrates one unit of work per request: query composition,
/// retrieval classification, generation planning, result validation, and
/// conversation-state updates.
///
/// All external collaborators are narrow trait objects so tests can
/// substitute deterministic fakes.
#[derive(Debug)]
pub struct WorkflowPipeline {
    catalog: Arc<CatalogIndex>,
    embedding: Arc<dyn EmbeddingProvider>,
    search: Arc<dyn VectorSearch>,
    generator: Arc<dyn TextGenerator>,
    state: Arc<ConversationState>,
    classifier: RetrievalClassifier,
    planner: GenerationPlanner,
    validator: ResultValidator,
}

impl WorkflowPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<CatalogIndex>,
        embedding: Arc<dyn EmbeddingProvider>,
        search: Arc<dyn VectorSearch>,
        generator: Arc<dyn TextGenerator>,
        state: Arc<ConversationState>,
        retrieval_config: RetrievalConfig,
        planner_config: PlannerConfig,
        validator_config: ValidatorConfig,
    ) -> Self {
        Self {
            catalog,
            embedding,
            search,
            generator,
            state,
            classifier: RetrievalClassifier::new(retrieval_config),
            planner: GenerationPlanner::new(planner_config),
            validator: ResultValidator::new(validator_config),
        }
    }

    /// Create a workflow from a natural-language query, or continue an
    /// existing conversation. When the conversation already has a current
    /// workflow version the request behaves as an edit.
    pub async fn create_or_continue(
        &self,
        query: &str,
        conversation_id: Option<&str>,
    ) -> Result<WorkflowOutcome, DomainError> {
        let conversation_id = match conversation_id {
            Some(id) => {
                // Existence check before taking the lock
                self.state.load_required(id).await?;
                id.to_string()
            }
            None => self.state.get_or_create(None).await?.id,
        };

        let _guard = self.state.guard(&conversation_id).await;
        self.run(&conversation_id, query).await
    }

    /// Apply an edit instruction to the conversation's current workflow.
    /// Fails with not-found when the conversation is absent, soft-deleted,
    /// or has no workflow to edit.
    pub async fn edit(
        &self,
        conversation_id: &str,
        instruction: &str,
    ) -> Result<WorkflowOutcome, DomainError> {
        self.state.load_required(conversation_id).await?;

        let _guard = self.state.guard(conversation_id).await;

        if self.state.current_version(conversation_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "No workflow to edit for conversation '{}'; create one first",
                conversation_id
            )));
        }

        self.run(conversation_id, instruction).await
    }

    /// Conversation history: kept verbatim window, summary, current version
    pub async fn conversation(&self, id: &str) -> Result<ConversationSnapshot, DomainError> {
        self.state.snapshot(id).await
    }

    /// Soft-delete a conversation; idempotent
    pub async fn delete_conversation(&self, id: &str) -> Result<(), DomainError> {
        self.state.delete(id).await
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub async fn vector_store_health(&self) -> Result<bool, DomainError> {
        self.search.health_check().await
    }

    pub async fn persistence_health(&self) -> Result<bool, DomainError> {
        self.state.health_check().await
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.provider_name()
    }

    /// One unit of work, executed under the conversation's exclusive
    /// section. `text` is the current request or edit instruction.
    async fn run(&self, conversation_id: &str, text: &str) -> Result<WorkflowOutcome, DomainError> {
        // Fresh read under the lock
        let conversation = self.state.load_required(conversation_id).await?;

        let composed = compose_query(&conversation.turns, text);
        debug!(conversation_id, query_len = composed.len(), "Composed retrieval query");

        let vector = self.embedding.embed(&composed).await?;
        let points = self
            .search
            .search(&vector, self.classifier.config().top_k)
            .await?;

        let classification = self.classifier.classify(self.resolve(points));
        info!(
            conversation_id,
            verdict = ?classification.verdict,
            candidates = classification.candidates.len(),
            top_score = classification.top_score,
            "Classified retrieval result"
        );

        if !classification.is_confident() {
            return self.conclude_no_match(conversation_id, text).await;
        }

        let current = self.state.current_version(conversation_id).await?;
        let mode = GenerationMode::select(current.as_ref());
        let prior = current.map(|version| version.document);

        let document = self
            .generate_validated(mode, &classification.candidates, text, prior.as_ref())
            .await?;

        self.state
            .record_turn(conversation_id, TurnRole::User, text)
            .await?;
        let note = match mode {
            GenerationMode::Create => CREATE_ACCEPTED_NOTE,
            GenerationMode::Edit => EDIT_ACCEPTED_NOTE,
        };
        self.state
            .record_turn(conversation_id, TurnRole::Assistant, note)
            .await?;

        let version = self.state.accept_document(conversation_id, document.clone()).await?;
        info!(conversation_id, version = version.version, "Accepted workflow version");

        Ok(WorkflowOutcome {
            conversation_id: conversation_id.to_string(),
            workflow: Some(document),
            version: Some(version.version),
            tools_used: classification.candidates.tool_slugs(),
            confidence_score: classification.confidence(),
            confidence_level: classification.confidence_level,
            verdict: classification.verdict,
            message: None,
        })
    }

    /// Resolve retrieved identifiers against the catalog, preserving rank
    /// order. Identifiers the catalog does not know are dropped.
    fn resolve(&self, points: Vec<ScoredPoint>) -> Vec<(ToolOperation, f32)> {
        points
            .into_iter()
            .filter_map(|point| match self.catalog.resolve(&point.operation_id) {
                Some(operation) => Some((operation.clone(), point.score)),
                None => {
                    warn!(
                        operation_id = %point.operation_id,
                        "Vector store returned an identifier unknown to the catalog"
                    );
                    None
                }
            })
            .collect()
    }

    /// Generate a document and validate it against the candidate set, with
    /// at most `max_corrective_attempts` corrective regenerations. The
    /// bounded loop makes exceeding the cap structurally impossible.
    async fn generate_validated(
        &self,
        mode: GenerationMode,
        candidates: &CandidateSet,
        text: &str,
        prior: Option<&WorkflowDocument>,
    ) -> Result<WorkflowDocument, DomainError> {
        let mut request = self.planner.plan(mode, candidates, text, prior)?;
        let max_attempts = self.validator.config().max_corrective_attempts;
        let mut last_rejected = Vec::new();

        for attempt in 0..=max_attempts {
            let response = self.generator.complete(request.clone()).await?;

            let document = parse_document(&response)?;
            document
                .validate_structure()
                .map_err(|defect| DomainError::generation_failure(defect.to_string()))?;

            match self.validator.check(&document, candidates) {
                Ok(()) => return Ok(document),
                Err(rejected) => {
                    warn!(
                        attempt,
                        rejected = ?rejected,
                        "Generated workflow referenced tools outside the candidate set"
                    );

                    if attempt < max_attempts {
                        request =
                            self.planner.corrective(mode, candidates, text, prior, &rejected)?;
                    }
                    last_rejected = rejected;
                }
            }
        }

        Err(DomainError::tool_hallucination(last_rejected))
    }

    /// Record the exchange and surface a need-more-detail outcome; no
    /// generation call is made and no workflow version is created.
    async fn conclude_no_match(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<WorkflowOutcome, DomainError> {
        let message = self.no_match_message();

        self.state
            .record_turn(conversation_id, TurnRole::User, text)
            .await?;
        self.state
            .record_turn(conversation_id, TurnRole::Assistant, message.as_str())
            .await?;

        Ok(WorkflowOutcome::no_match(conversation_id, message))
    }

    fn no_match_message(&self) -> String {
        let categories = self.catalog.categories();
        if categories.is_empty() {
            "No tools found matching your request.".to_string()
        } else {
            format!(
                "No tools found matching your request. Available categories: {}",
                categories.join(", ")
            )
        }
    }
}
