//! Generation planning: mode selection and prompt construction

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::provider::CompletionRequest;
use crate::domain::retrieval::CandidateSet;
use crate::domain::workflow::{WorkflowDocument, WorkflowVersion};
use crate::domain::DomainError;

/// Configuration for generation requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Whether the generator authors a new workflow or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Create,
    Edit,
}

impl GenerationMode {
    /// Edit iff the conversation has a current workflow version
    pub fn select(current: Option<&WorkflowVersion>) -> Self {
        if current.is_some() {
            Self::Edit
        } else {
            Self::Create
        }
    }
}

const CREATE_SYSTEM: &str = "You are a workflow automation expert. You build workflow \
definitions using only the operations offered to you.";

const EDIT_SYSTEM: &str = "You are a workflow automation editor. You apply the requested \
change to an existing workflow, preserving node ids and untouched branches, using only \
the operations offered to you.";

const OUTPUT_SHAPE: &str = r#"Generate a workflow JSON with this structure:
{
  "nodes": [
    {
      "id": "node1",
      "type": "tool_slug.operation_slug",
      "displayName": "Operation Display Name",
      "parameters": {
        "param1": "value1"
      }
    }
  ],
  "connections": {
    "node1": {"next": "node2"}
  }
}"#;

/// Assembles generation requests for the text-generation collaborator
#[derive(Debug, Clone)]
pub struct GenerationPlanner {
    config: PlannerConfig,
}

impl GenerationPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Build the generation request for the selected mode.
    ///
    /// Edit mode serializes the full prior document verbatim so the
    /// generator can emit a complete replacement.
    pub fn plan(
        &self,
        mode: GenerationMode,
        candidates: &CandidateSet,
        text: &str,
        prior: Option<&WorkflowDocument>,
    ) -> Result<CompletionRequest, DomainError> {
        match mode {
            GenerationMode::Create => Ok(self.create_request(candidates, text)),
            GenerationMode::Edit => {
                let prior = prior.ok_or_else(|| {
                    DomainError::internal("Edit mode planned without a prior workflow document")
                })?;
                self.edit_request(candidates, text, prior)
            }
        }
    }

    /// Build the single corrective request issued after a tool violation
    pub fn corrective(
        &self,
        mode: GenerationMode,
        candidates: &CandidateSet,
        text: &str,
        prior: Option<&WorkflowDocument>,
        rejected: &[String],
    ) -> Result<CompletionRequest, DomainError> {
        let base = self.plan(mode, candidates, text, prior)?;

        let mut preamble = String::new();
        let _ = writeln!(
            preamble,
            "IMPORTANT: your previous workflow used operations that are not available: {}.",
            rejected.join(", ")
        );
        let _ = writeln!(
            preamble,
            "The only allowed tools are: {}. Use no others.",
            candidates.tool_slugs().join(", ")
        );
        preamble.push('\n');

        Ok(CompletionRequest {
            prompt: format!("{}{}", preamble, base.prompt),
            ..base
        })
    }

    fn create_request(&self, candidates: &CandidateSet, text: &str) -> CompletionRequest {
        let prompt = format!(
            r#"Generate a workflow JSON based on the user's request.

User request: "{}"

Available tools:
{}

{}

Rules:
1. Use the most relevant tools from the list above and no others
2. Create unique node IDs (node1, node2, etc.)
3. Set node type as "tool_slug.operation_slug" (e.g., "gmail.send-email")
4. Fill parameters based on the user's request
5. Connect nodes in logical order
6. If the user mentions specific values (emails, channel names), include them in parameters

Output ONLY the JSON. No markdown, no explanations, no backticks."#,
            text,
            format_candidates(candidates),
            OUTPUT_SHAPE,
        );

        CompletionRequest::new(prompt)
            .with_system(CREATE_SYSTEM)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature)
    }

    fn edit_request(
        &self,
        candidates: &CandidateSet,
        instruction: &str,
        prior: &WorkflowDocument,
    ) -> Result<CompletionRequest, DomainError> {
        let serialized = serde_json::to_string_pretty(prior)
            .map_err(|e| DomainError::internal(format!("Failed to serialize workflow: {}", e)))?;

        let prompt = format!(
            r#"Current workflow:
{}

User wants to: {}

Available tools:
{}

Output the COMPLETE updated workflow as valid JSON.
Include all nodes and connections, preserving the ids of untouched nodes.
Output ONLY the JSON, no markdown, no explanations."#,
            serialized,
            instruction,
            format_candidates(candidates),
        );

        Ok(CompletionRequest::new(prompt)
            .with_system(EDIT_SYSTEM)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature))
    }
}

/// Serialize the candidate operations for the generator context
fn format_candidates(candidates: &CandidateSet) -> String {
    let mut context = String::new();

    for candidate in candidates.iter() {
        let operation = &candidate.operation;

        let _ = writeln!(context, "Tool: {}", operation.tool_display_name);
        let _ = writeln!(context, "Operation: {}", operation.operation_display_name);
        let _ = writeln!(context, "Identifier: {}", operation.id);
        let _ = writeln!(context, "Description: {}", operation.description);

        let required = operation.required_parameters();
        let optional = operation.optional_parameters();
        let _ = writeln!(
            context,
            "Required inputs: {}",
            if required.is_empty() { "None".to_string() } else { required.join(", ") }
        );
        let _ = writeln!(
            context,
            "Optional inputs: {}",
            if optional.is_empty() { "None".to_string() } else { optional.join(", ") }
        );

        let _ = writeln!(context, "Score: {:.4}", candidate.score);
        context.push('\n');
    }

    context.trim_end().to_string()
}
