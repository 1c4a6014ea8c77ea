//! API error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, StepDataError};

/// Error categories exposed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    NotFoundError,
    InvalidStepError,
    ConflictError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::InvalidStepError => write!(f, "invalid_step_error"),
            Self::ConflictError => write!(f, "conflict_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorType::InvalidRequestError,
            message,
        )
    }

    /// Authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ApiErrorType::AuthenticationError,
            message,
        )
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// Data-integrity error on a persisted step record.
    ///
    /// Distinct from not-found so callers can tell a malformed record
    /// from an absent one.
    pub fn invalid_step(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorType::InvalidStepError,
            message,
        )
    }

    /// Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorType::ConflictError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ServerError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Conflict { message } => Self::conflict(message),
            DomainError::Storage { message } => Self::internal(message),
            DomainError::Configuration { message } => Self::internal(message),
            DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl From<StepDataError> for ApiError {
    fn from(err: StepDataError) -> Self {
        match err {
            StepDataError::WorkflowNotFound { .. } | StepDataError::StepNotFound { .. } => {
                Self::not_found(err.to_string())
            }
            StepDataError::InvalidStep { .. } => {
                Self::invalid_step(err.to_string()).with_code("invalid_step")
            }
            StepDataError::MissingTriggerIdentifier { .. } => {
                Self::invalid_step(err.to_string()).with_code("missing_trigger")
            }
            StepDataError::Storage(inner) => Self::from(inner),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Invalid workflow identifier");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.response.error.error_type,
            ApiErrorType::InvalidRequestError
        );
    }

    #[test]
    fn test_domain_error_conversion() {
        let api_err: ApiError = DomainError::not_found("Workflow 'x' not found").into();
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);

        let api_err: ApiError = DomainError::conflict("identifier taken").into();
        assert_eq!(api_err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_step_data_error_conversion() {
        let api_err: ApiError = StepDataError::workflow_not_found("ghost").into();
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);

        let api_err: ApiError = StepDataError::step_not_found("wf", "ghost").into();
        assert_eq!(api_err.status, StatusCode::NOT_FOUND);

        let api_err: ApiError = StepDataError::invalid_step("s1", &["name"]).into();
        assert_eq!(api_err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            api_err.response.error.error_type,
            ApiErrorType::InvalidStepError
        );
        assert_eq!(api_err.response.error.code.as_deref(), Some("invalid_step"));
    }

    #[test]
    fn test_storage_error_maps_to_server_error() {
        let inner = DomainError::storage("connection reset");
        let api_err: ApiError = StepDataError::from(inner).into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::invalid_step("Step 's1' is missing required fields: name");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("invalid_step_error"));
        assert!(json.contains("missing required fields"));
    }
}
