//! NotifyHub Workflow API
//!
//! Backend for defining, storing and serving notification workflow and
//! step configurations:
//! - Workflow CRUD with paginated search and environment sync
//! - Step data assembly (control schemas + values + variable schema)
//! - Step preview rendering against sample payloads
//! - A typed REST client facade for dashboard and SDK code

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::services::{PreviewService, StepDataService, WorkflowService};
use infrastructure::{
    InMemoryControlValuesRepository, InMemoryWorkflowRepository, StepVariableSchemaBuilder,
};

/// Create the application state with all services wired to in-memory
/// repositories
pub fn create_app_state() -> AppState {
    let workflow_repository = Arc::new(InMemoryWorkflowRepository::new());
    let control_values_repository = Arc::new(InMemoryControlValuesRepository::new());
    let variable_schema_builder = Arc::new(StepVariableSchemaBuilder::new());

    let workflow_service = Arc::new(WorkflowService::new(
        workflow_repository.clone(),
        control_values_repository.clone(),
    ));
    let step_data_service = Arc::new(StepDataService::new(
        workflow_repository.clone(),
        control_values_repository.clone(),
        variable_schema_builder,
    ));
    let preview_service = Arc::new(PreviewService::new(
        workflow_repository,
        control_values_repository,
    ));

    AppState::new(workflow_service, step_data_service, preview_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestContext;
    use crate::infrastructure::services::CreateWorkflowCommand;

    #[tokio::test]
    async fn test_app_state_wires_shared_repositories() {
        let state = create_app_state();
        let context = RequestContext::new("env-1", "org-1", "user-1");

        // A workflow created through the workflow service must be
        // visible to the step data service.
        let workflow = state
            .workflow_service
            .create(
                &context,
                CreateWorkflowCommand {
                    identifier: "onboarding".to_string(),
                    name: "Onboarding".to_string(),
                    description: None,
                    tags: Vec::new(),
                    active: true,
                    origin: None,
                    steps: vec![crate::infrastructure::services::StepCommand {
                        step_id: None,
                        name: "Send Email".to_string(),
                        step_type: crate::domain::StepType::Email,
                        control_values: None,
                    }],
                },
            )
            .await
            .unwrap();

        let step_data = state
            .step_data_service
            .build(&context, "onboarding", "send-email")
            .await
            .unwrap();

        assert_eq!(step_data.workflow_database_id, workflow.id());
        assert_eq!(step_data.step_id, "send-email");
    }
}
