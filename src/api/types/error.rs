//! API error types preserving the domain error taxonomy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error kinds exposed over the API.
///
/// Collaborator failures keep their kind so callers can distinguish a
/// degraded embedding provider from a degraded generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    ValidationError,
    NotFound,
    EmbeddingProviderError,
    RetrievalProviderError,
    GenerationFailure,
    ToolHallucination,
    StorageError,
    InternalError,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub kind: ApiErrorKind,
    pub message: String,
    /// Rejected tool identifiers, present only for tool hallucinations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_tools: Option<Vec<String>>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    kind,
                    message: message.into(),
                    rejected_tools: None,
                },
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorKind::ValidationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorKind::InternalError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::EmbeddingProvider { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorKind::EmbeddingProviderError,
                err.to_string(),
            ),
            DomainError::RetrievalProvider { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorKind::RetrievalProviderError,
                err.to_string(),
            ),
            DomainError::GenerationFailure { message } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorKind::GenerationFailure,
                message,
            ),
            DomainError::ToolHallucination { ref rejected } => {
                let mut api_error = Self::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiErrorKind::ToolHallucination,
                    err.to_string(),
                );
                api_error.response.error.rejected_tools = Some(rejected.clone());
                api_error
            }
            DomainError::Storage { message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorKind::StorageError,
                message,
            ),
            DomainError::Configuration { message } | DomainError::Internal { message } => {
                Self::internal(message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.response.error.kind, self.response.error.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let api_error: ApiError = DomainError::not_found("Conversation 'x' not found").into();

        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.response.error.kind, ApiErrorKind::NotFound);
    }

    #[test]
    fn test_provider_errors_map_to_503_with_kind() {
        let embedding: ApiError = DomainError::embedding_provider("voyage", "down").into();
        let retrieval: ApiError = DomainError::retrieval_provider("qdrant", "down").into();
        let generation: ApiError = DomainError::generation_failure("bad output").into();

        assert_eq!(embedding.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(embedding.response.error.kind, ApiErrorKind::EmbeddingProviderError);
        assert_eq!(retrieval.response.error.kind, ApiErrorKind::RetrievalProviderError);
        assert_eq!(generation.response.error.kind, ApiErrorKind::GenerationFailure);
    }

    #[test]
    fn test_tool_hallucination_maps_to_422_with_rejected_list() {
        let api_error: ApiError =
            DomainError::tool_hallucination(vec!["teams.send-message".into()]).into();

        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            api_error.response.error.rejected_tools,
            Some(vec!["teams.send-message".to_string()])
        );
    }

    #[test]
    fn test_kind_serialization_is_snake_case() {
        let api_error = ApiError::bad_request("Query cannot be empty");
        let json = serde_json::to_string(&api_error.response).unwrap();

        assert!(json.contains("validation_error"));
        assert!(json.contains("Query cannot be empty"));
    }
}
