//! Workflow domain module
//!
//! A workflow is an ordered sequence of notification steps (email,
//! in-app, SMS, push, chat, plus delay/digest actions) fired by a
//! trigger. Steps carry a template with control schemas; user-configured
//! control values live in their own records (see
//! [`crate::domain::control_values`]).

mod entity;
mod error;
pub mod repository;
mod step;
mod step_data;

pub use entity::{
    validate_trigger_identifier, TriggerIdentifier, TriggerType, Workflow, WorkflowOrigin,
    WorkflowTrigger, MAX_IDENTIFIER_LENGTH,
};
pub use error::{StepDataError, WorkflowError};
pub use repository::{
    OrderDirection, WorkflowLookup, WorkflowOrderField, WorkflowPage, WorkflowRepository,
    WorkflowSearchQuery,
};
pub use step::{CompleteStep, ControlSchema, Step, StepTemplate, StepType};
pub use step_data::{StepControls, StepData};
