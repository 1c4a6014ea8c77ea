//! Workflow management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;
use validator::Validate;

use crate::api::middleware::RequireContext;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateWorkflowRequest, Json, ListWorkflowsResponse, PatchWorkflowRequest,
    SearchQueryParams, SyncWorkflowRequest, UpdateWorkflowRequest, WorkflowResponse,
    WorkflowTestDataResponse,
};
use crate::domain::WorkflowSearchQuery;

/// POST /v2/workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Json(request): Json<CreateWorkflowRequest>,
) -> Result<Response, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    debug!(workflow_id = %request.workflow_id, "Creating workflow");

    let workflow = state
        .workflow_service
        .create(&context, request.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkflowResponse::from(&workflow)),
    )
        .into_response())
}

/// GET /v2/workflows/{workflow_id}
pub async fn get_workflow(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let workflow = state
        .workflow_service
        .get(&context, &workflow_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Workflow '{}' not found", workflow_id)))?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// PUT /v2/workflows/{workflow_id}
pub async fn update_workflow(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path(workflow_id): Path<String>,
    Json(request): Json<UpdateWorkflowRequest>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let workflow = state
        .workflow_service
        .update(&context, &workflow_id, request.into())
        .await?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// PATCH /v2/workflows/{workflow_id}
pub async fn patch_workflow(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path(workflow_id): Path<String>,
    Json(request): Json<PatchWorkflowRequest>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let workflow = state
        .workflow_service
        .patch(&context, &workflow_id, request.into())
        .await?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// DELETE /v2/workflows/{workflow_id}
pub async fn delete_workflow(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path(workflow_id): Path<String>,
) -> Result<Response, ApiError> {
    let deleted = state
        .workflow_service
        .delete(&context, &workflow_id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found(format!(
            "Workflow '{}' not found",
            workflow_id
        )));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /v2/workflows
pub async fn search_workflows(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<ListWorkflowsResponse>, ApiError> {
    let mut query = WorkflowSearchQuery::new(&context)
        .with_offset(params.offset.unwrap_or(0))
        .with_limit(params.limit.unwrap_or(50));

    if let Some(direction) = params.order_direction {
        query.order_direction = direction;
    }
    if let Some(field) = params.order_by_field {
        query.order_by_field = field;
    }
    if let Some(text) = params.query {
        query = query.with_query(text);
    }

    let page = state.workflow_service.search(&query).await?;

    Ok(Json(ListWorkflowsResponse {
        workflows: page.workflows.iter().map(WorkflowResponse::from).collect(),
        total_count: page.total_count,
    }))
}

/// PUT /v2/workflows/{workflow_id}/sync
pub async fn sync_workflow(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path(workflow_id): Path<String>,
    Json(request): Json<SyncWorkflowRequest>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let workflow = state
        .workflow_service
        .sync(&context, &workflow_id, &request.target_environment_id)
        .await?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// GET /v2/workflows/{workflow_id}/test-data
pub async fn get_test_data(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowTestDataResponse>, ApiError> {
    let test_data = state
        .workflow_service
        .test_data(&context, &workflow_id)
        .await?;

    Ok(Json(WorkflowTestDataResponse::from(test_data)))
}
