//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{PreviewService, StepDataService, WorkflowService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub workflow_service: Arc<WorkflowService>,
    pub step_data_service: Arc<StepDataService>,
    pub preview_service: Arc<PreviewService>,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        workflow_service: Arc<WorkflowService>,
        step_data_service: Arc<StepDataService>,
        preview_service: Arc<PreviewService>,
    ) -> Self {
        Self {
            workflow_service,
            step_data_service,
            preview_service,
        }
    }
}
