//! Application services orchestrating repositories and builders

mod preview_service;
mod step_data_service;
mod workflow_service;

pub use preview_service::{GeneratePreviewCommand, PreviewResult, PreviewService};
pub use step_data_service::{PatchStepData, StepDataService};
pub use workflow_service::{
    CreateWorkflowCommand, PatchWorkflowCommand, StepCommand, UpdateWorkflowCommand,
    WorkflowService, WorkflowTestData,
};
