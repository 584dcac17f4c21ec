//! Workflow creation, editing, and conversation endpoints

use axum::extract::{Path, State};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{
    validate_conversation_id, ApiError, ConversationResponse, CreateWorkflowRequest,
    DeleteResponse, EditWorkflowRequest, Json, WorkflowResponse,
};

/// POST /api/workflow/create
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkflowRequest>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let query = request.validated_query()?;
    info!(
        continuing = request.conversation_id.is_some(),
        "Workflow creation request"
    );

    let outcome = state
        .pipeline
        .create_or_continue(&query, request.conversation_id.as_deref())
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /api/workflow/edit
pub async fn edit_workflow(
    State(state): State<AppState>,
    Json(request): Json<EditWorkflowRequest>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let instruction = request.validated_instruction()?;
    info!(conversation_id = %request.conversation_id, "Workflow edit request");

    let outcome = state
        .pipeline
        .edit(&request.conversation_id, &instruction)
        .await?;

    Ok(Json(outcome.into()))
}

/// GET /api/workflow/conversation/{conversation_id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    validate_conversation_id(&conversation_id)?;

    let snapshot = state.pipeline.conversation(&conversation_id).await?;

    Ok(Json(snapshot.into()))
}

/// DELETE /api/workflow/conversation/{conversation_id}
///
/// Soft delete; idempotent, deleting twice succeeds.
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    validate_conversation_id(&conversation_id)?;

    state.pipeline.delete_conversation(&conversation_id).await?;
    info!(conversation_id = %conversation_id, "Deleted conversation");

    Ok(Json(DeleteResponse {
        success: true,
        message: "Conversation deleted successfully".to_string(),
    }))
}
