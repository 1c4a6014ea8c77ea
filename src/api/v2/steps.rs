//! Step data endpoints

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::middleware::RequireContext;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, GeneratePreviewRequest, GeneratePreviewResponse, Json, PatchStepDataRequest,
};
use crate::domain::StepData;
use crate::infrastructure::services::{GeneratePreviewCommand, PatchStepData};

/// GET /v2/workflows/{workflow_id}/steps/{step_id}
pub async fn get_step_data(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path((workflow_id, step_id)): Path<(String, String)>,
) -> Result<Json<StepData>, ApiError> {
    debug!(
        workflow_id = %workflow_id,
        step_id = %step_id,
        "Fetching step data"
    );

    let step_data = state
        .step_data_service
        .build(&context, &workflow_id, &step_id)
        .await?;

    Ok(Json(step_data))
}

/// PATCH /v2/workflows/{workflow_id}/steps/{step_id}
pub async fn patch_step_data(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path((workflow_id, step_id)): Path<(String, String)>,
    Json(request): Json<PatchStepDataRequest>,
) -> Result<Json<StepData>, ApiError> {
    let step_data = state
        .step_data_service
        .patch(
            &context,
            &workflow_id,
            &step_id,
            PatchStepData {
                name: request.name,
                control_values: request.control_values,
            },
        )
        .await?;

    Ok(Json(step_data))
}

/// POST /v2/workflows/{workflow_id}/step/{step_database_id}/preview
pub async fn generate_preview(
    State(state): State<AppState>,
    RequireContext(context): RequireContext,
    Path((workflow_id, step_database_id)): Path<(String, String)>,
    Json(request): Json<GeneratePreviewRequest>,
) -> Result<Json<GeneratePreviewResponse>, ApiError> {
    let result = state
        .preview_service
        .generate(
            &context,
            &workflow_id,
            &step_database_id,
            GeneratePreviewCommand {
                control_values: request.control_values,
                preview_payload: request.preview_payload,
            },
        )
        .await?;

    Ok(Json(GeneratePreviewResponse::from(result)))
}
