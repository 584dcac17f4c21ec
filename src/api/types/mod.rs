//! API request, response, and error types

mod error;
mod json;
mod requests;
mod responses;

pub use error::{ApiError, ApiErrorDetail, ApiErrorKind, ApiErrorResponse};
pub use json::Json;
pub use requests::{validate_conversation_id, CreateWorkflowRequest, EditWorkflowRequest};
pub use responses::{CatalogResponse, ConversationResponse, DeleteResponse, WorkflowResponse};
