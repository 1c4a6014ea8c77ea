//! Domain layer - Core business logic and entities

pub mod context;
pub mod control_values;
pub mod error;
pub mod variable_schema;
pub mod workflow;

pub use context::RequestContext;
pub use control_values::{
    ControlValuesLevel, ControlValuesQuery, ControlValuesRecord, ControlValuesRepository,
};
pub use error::DomainError;
pub use variable_schema::{VariableSchemaBuilder, VariableSchemaQuery};
pub use workflow::{
    CompleteStep, ControlSchema, OrderDirection, Step, StepControls, StepData, StepDataError,
    StepTemplate, StepType, TriggerIdentifier, TriggerType, Workflow, WorkflowError,
    WorkflowLookup, WorkflowOrderField, WorkflowOrigin, WorkflowPage, WorkflowRepository,
    WorkflowSearchQuery, WorkflowTrigger,
};
