//! API types - error envelope, JSON extraction, request/response DTOs

pub mod error;
pub mod json;
pub mod workflow;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use workflow::{
    CreateWorkflowRequest, GeneratePreviewRequest, GeneratePreviewResponse,
    ListWorkflowsResponse, PatchStepDataRequest, PatchWorkflowRequest, SearchQueryParams,
    StepPreviewResponse, StepRequest, StepSummaryResponse, SyncWorkflowRequest,
    UpdateWorkflowRequest, WorkflowResponse, WorkflowTestDataResponse,
};
