//! Workflow and step-data error types

use thiserror::Error;

use crate::domain::DomainError;

/// Validation errors for workflow definitions
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Errors raised while assembling step data.
///
/// The first four variants are raised locally with the identifiers the
/// caller supplied attached for diagnosability; collaborator failures
/// propagate unmodified through `Storage`.
#[derive(Debug, Error)]
pub enum StepDataError {
    /// No workflow matches the identifier within the caller's scope
    #[error("No workflow found for '{workflow_id}'")]
    WorkflowNotFound { workflow_id: String },

    /// The workflow exists but contains no step with the given id
    #[error("No step '{step_id}' found in workflow '{workflow_id}'")]
    StepNotFound {
        workflow_id: String,
        step_id: String,
    },

    /// The persisted step record fails structural invariants; a data
    /// integrity fault, not a client mistake
    #[error("Step '{step_id}' is missing required fields: {missing}")]
    InvalidStep { step_id: String, missing: String },

    /// The workflow carries no trigger, so it has no external identifier
    #[error("Workflow '{workflow_id}' has no trigger identifier")]
    MissingTriggerIdentifier { workflow_id: String },

    /// Underlying storage failure, propagated unmodified
    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl StepDataError {
    pub fn workflow_not_found(workflow_id: impl Into<String>) -> Self {
        Self::WorkflowNotFound {
            workflow_id: workflow_id.into(),
        }
    }

    pub fn step_not_found(workflow_id: impl Into<String>, step_id: impl Into<String>) -> Self {
        Self::StepNotFound {
            workflow_id: workflow_id.into(),
            step_id: step_id.into(),
        }
    }

    pub fn invalid_step(step_id: impl Into<String>, missing: &[&str]) -> Self {
        Self::InvalidStep {
            step_id: step_id.into(),
            missing: missing.join(", "),
        }
    }

    pub fn missing_trigger_identifier(workflow_id: impl Into<String>) -> Self {
        Self::MissingTriggerIdentifier {
            workflow_id: workflow_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_not_found_message() {
        let error = StepDataError::workflow_not_found("billing");
        assert_eq!(error.to_string(), "No workflow found for 'billing'");
    }

    #[test]
    fn test_step_not_found_carries_both_identifiers() {
        let error = StepDataError::step_not_found("billing", "missing");
        assert_eq!(
            error.to_string(),
            "No step 'missing' found in workflow 'billing'"
        );
    }

    #[test]
    fn test_invalid_step_lists_missing_fields() {
        let error = StepDataError::invalid_step("send-email", &["name", "type"]);
        assert_eq!(
            error.to_string(),
            "Step 'send-email' is missing required fields: name, type"
        );
    }

    #[test]
    fn test_storage_error_propagates_unmodified() {
        let inner = DomainError::storage("connection reset");
        let error = StepDataError::from(inner);
        assert_eq!(error.to_string(), "Storage error: connection reset");
    }
}
