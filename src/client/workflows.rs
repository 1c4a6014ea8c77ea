//! Typed workflow client
//!
//! One method per remote action, each issuing a single HTTP call and
//! returning the uniform [`RestResult`] envelope.

use serde::Serialize;

use super::http::{ClientError, RestClient, RestResult};
use crate::api::types::{
    CreateWorkflowRequest, GeneratePreviewRequest, GeneratePreviewResponse,
    ListWorkflowsResponse, PatchStepDataRequest, PatchWorkflowRequest, SearchQueryParams,
    SyncWorkflowRequest, UpdateWorkflowRequest, WorkflowResponse, WorkflowTestDataResponse,
};
use crate::domain::StepData;

/// Remote client for the workflow v2 API
#[derive(Debug, Clone)]
pub struct WorkflowsClient {
    http: RestClient,
}

impl WorkflowsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: RestClient::new(base_url),
        }
    }

    /// Attach a default header (context or auth) to every request
    pub fn with_header(self, name: &str, value: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: self.http.with_header(name, value)?,
        })
    }

    pub async fn create_workflow(
        &self,
        request: &CreateWorkflowRequest,
    ) -> Result<RestResult<WorkflowResponse>, ClientError> {
        self.http.post("/v2/workflows", request).await
    }

    pub async fn update_workflow(
        &self,
        workflow_id: &str,
        request: &UpdateWorkflowRequest,
    ) -> Result<RestResult<WorkflowResponse>, ClientError> {
        self.http
            .put(&format!("/v2/workflows/{}", workflow_id), request)
            .await
    }

    pub async fn sync_workflow(
        &self,
        workflow_id: &str,
        request: &SyncWorkflowRequest,
    ) -> Result<RestResult<WorkflowResponse>, ClientError> {
        self.http
            .put(&format!("/v2/workflows/{}/sync", workflow_id), request)
            .await
    }

    pub async fn get_workflow(
        &self,
        workflow_id: &str,
    ) -> Result<RestResult<WorkflowResponse>, ClientError> {
        self.http
            .get(&format!("/v2/workflows/{}", workflow_id))
            .await
    }

    pub async fn get_step_data(
        &self,
        workflow_id: &str,
        step_id: &str,
    ) -> Result<RestResult<StepData>, ClientError> {
        self.http
            .get(&format!("/v2/workflows/{}/steps/{}", workflow_id, step_id))
            .await
    }

    pub async fn patch_step_data(
        &self,
        workflow_id: &str,
        step_id: &str,
        request: &PatchStepDataRequest,
    ) -> Result<RestResult<StepData>, ClientError> {
        self.http
            .patch(
                &format!("/v2/workflows/{}/steps/{}", workflow_id, step_id),
                request,
            )
            .await
    }

    pub async fn patch_workflow(
        &self,
        workflow_id: &str,
        request: &PatchWorkflowRequest,
    ) -> Result<RestResult<WorkflowResponse>, ClientError> {
        self.http
            .patch(&format!("/v2/workflows/{}", workflow_id), request)
            .await
    }

    pub async fn delete_workflow(
        &self,
        workflow_id: &str,
    ) -> Result<RestResult<()>, ClientError> {
        self.http
            .delete(&format!("/v2/workflows/{}", workflow_id))
            .await
    }

    /// Paginated search; offset and limit are always sent, defaulting to
    /// 0 and 50 when the caller omits them
    pub async fn search_workflows(
        &self,
        params: &SearchQueryParams,
    ) -> Result<RestResult<ListWorkflowsResponse>, ClientError> {
        let mut query: Vec<(&str, String)> = vec![
            ("offset", params.offset.unwrap_or(0).to_string()),
            ("limit", params.limit.unwrap_or(50).to_string()),
        ];

        if let Some(direction) = &params.order_direction {
            query.push(("orderDirection", enum_param(direction)));
        }
        if let Some(field) = &params.order_by_field {
            query.push(("orderByField", enum_param(field)));
        }
        if let Some(text) = &params.query {
            query.push(("query", text.clone()));
        }

        self.http.get_with_query("/v2/workflows", &query).await
    }

    pub async fn generate_preview(
        &self,
        workflow_id: &str,
        step_database_id: &str,
        request: &GeneratePreviewRequest,
    ) -> Result<RestResult<GeneratePreviewResponse>, ClientError> {
        self.http
            .post(
                &format!(
                    "/v2/workflows/{}/step/{}/preview",
                    workflow_id, step_database_id
                ),
                request,
            )
            .await
    }

    pub async fn get_test_data(
        &self,
        workflow_id: &str,
    ) -> Result<RestResult<WorkflowTestDataResponse>, ClientError> {
        self.http
            .get(&format!("/v2/workflows/{}/test-data", workflow_id))
            .await
    }
}

/// Render a unit enum through its serde wire name
fn enum_param<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|value| value.as_str().map(String::from))
        .unwrap_or_default()
}
