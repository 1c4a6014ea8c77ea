//! Workflow API request and response types
//!
//! Shared by the server handlers and the REST client facade, so every
//! type derives both Serialize and Deserialize.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::domain::{
    OrderDirection, Step, StepType, Workflow, WorkflowOrderField, WorkflowOrigin,
};
use crate::infrastructure::services::{
    CreateWorkflowCommand, PatchWorkflowCommand, PreviewResult, StepCommand,
    UpdateWorkflowCommand, WorkflowTestData,
};

fn default_true() -> bool {
    true
}

/// One step in a create/update request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRequest {
    /// Existing external step id; omit for new steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,

    pub name: String,

    #[serde(rename = "type")]
    pub step_type: StepType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_values: Option<Map<String, Value>>,
}

impl From<StepRequest> for StepCommand {
    fn from(request: StepRequest) -> Self {
        Self {
            step_id: request.step_id,
            name: request.name,
            step_type: request.step_type,
            control_values: request.control_values,
        }
    }
}

/// Request to create a new workflow
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowRequest {
    /// Trigger identifier, the workflow's external handle
    #[validate(length(min = 1, max = 64))]
    pub workflow_id: String,

    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<WorkflowOrigin>,

    #[serde(default)]
    pub steps: Vec<StepRequest>,
}

impl From<CreateWorkflowRequest> for CreateWorkflowCommand {
    fn from(request: CreateWorkflowRequest) -> Self {
        Self {
            identifier: request.workflow_id,
            name: request.name,
            description: request.description,
            tags: request.tags,
            active: request.active,
            origin: request.origin,
            steps: request.steps.into_iter().map(StepCommand::from).collect(),
        }
    }
}

/// Request to fully replace a workflow definition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkflowRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub steps: Vec<StepRequest>,
}

impl From<UpdateWorkflowRequest> for UpdateWorkflowCommand {
    fn from(request: UpdateWorkflowRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            tags: request.tags,
            active: request.active,
            steps: request.steps.into_iter().map(StepCommand::from).collect(),
        }
    }
}

/// Request to partially update workflow metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchWorkflowRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl From<PatchWorkflowRequest> for PatchWorkflowCommand {
    fn from(request: PatchWorkflowRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            tags: request.tags,
            active: request.active,
        }
    }
}

/// Request to sync a workflow into another environment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SyncWorkflowRequest {
    #[validate(length(min = 1))]
    pub target_environment_id: String,
}

/// Request to partially update one step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchStepDataRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_values: Option<Map<String, Value>>,
}

/// Request to render a step preview
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePreviewRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_values: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_payload: Option<Value>,
}

/// Rendered preview of one step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePreviewResponse {
    pub result: StepPreviewResponse,
    pub preview_payload_example: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPreviewResponse {
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub preview: Value,
}

impl From<PreviewResult> for GeneratePreviewResponse {
    fn from(result: PreviewResult) -> Self {
        Self {
            result: StepPreviewResponse {
                step_type: result.step_type,
                preview: result.preview,
            },
            preview_payload_example: result.preview_payload_example,
        }
    }
}

/// Test event skeleton for a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTestDataResponse {
    pub to: Value,
    pub payload: Value,
}

impl From<WorkflowTestData> for WorkflowTestDataResponse {
    fn from(data: WorkflowTestData) -> Self {
        Self {
            to: data.to,
            payload: data.payload,
        }
    }
}

/// Step summary inside a workflow response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummaryResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub step_type: Option<StepType>,
}

impl From<&Step> for StepSummaryResponse {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id().map(String::from),
            step_id: step.step_id().map(String::from),
            name: step.name().map(String::from),
            step_type: step.template().map(|t| t.step_type()),
        }
    }
}

/// Full workflow response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    #[serde(rename = "_id")]
    pub id: String,

    /// Trigger identifier; empty for workflows without triggers
    pub workflow_id: String,

    pub name: String,

    pub origin: WorkflowOrigin,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub tags: Vec<String>,

    pub active: bool,

    pub steps: Vec<StepSummaryResponse>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<&Workflow> for WorkflowResponse {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id().to_string(),
            workflow_id: workflow.trigger_identifier().unwrap_or_default().to_string(),
            name: workflow.name().to_string(),
            origin: workflow.origin_or_default(),
            description: workflow.description().map(String::from),
            tags: workflow.tags().to_vec(),
            active: workflow.is_active(),
            steps: workflow.steps().iter().map(StepSummaryResponse::from).collect(),
            created_at: workflow.created_at().to_rfc3339(),
            updated_at: workflow.updated_at().to_rfc3339(),
        }
    }
}

/// Paginated workflow search response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkflowsResponse {
    pub workflows: Vec<WorkflowResponse>,
    pub total_count: usize,
}

/// Query parameters for workflow search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<OrderDirection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by_field: Option<WorkflowOrderField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}
