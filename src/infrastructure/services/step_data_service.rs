//! Step data assembly - resolves a workflow, locates a step, loads its
//! control values and derives its variable schema into one projection

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{
    ControlValuesQuery, ControlValuesRepository, RequestContext, StepControls, StepData,
    StepDataError, VariableSchemaBuilder, VariableSchemaQuery, WorkflowLookup, WorkflowRepository,
};

/// Partial update of one step: rename it, replace its control values,
/// or both
#[derive(Debug, Clone, Default)]
pub struct PatchStepData {
    pub name: Option<String>,
    pub control_values: Option<Map<String, Value>>,
}

/// Assembles the step data projection.
///
/// Holds no state across calls; every sub-operation runs strictly in
/// sequence because each consumes the previous one's output.
#[derive(Debug)]
pub struct StepDataService {
    workflow_repository: Arc<dyn WorkflowRepository>,
    control_values_repository: Arc<dyn ControlValuesRepository>,
    variable_schema_builder: Arc<dyn VariableSchemaBuilder>,
}

impl StepDataService {
    pub fn new(
        workflow_repository: Arc<dyn WorkflowRepository>,
        control_values_repository: Arc<dyn ControlValuesRepository>,
        variable_schema_builder: Arc<dyn VariableSchemaBuilder>,
    ) -> Self {
        Self {
            workflow_repository,
            control_values_repository,
            variable_schema_builder,
        }
    }

    /// Build the step data projection for one step of one workflow.
    ///
    /// `identifier_or_internal_id` accepts either the workflow's trigger
    /// identifier or its internal id; `step_id` accepts either the
    /// step's internal id or its external step id.
    pub async fn build(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
        step_id: &str,
    ) -> Result<StepData, StepDataError> {
        let lookup = WorkflowLookup::new(context, identifier_or_internal_id);
        let workflow = self
            .workflow_repository
            .find_by_identifier_or_id(&lookup)
            .await?
            .ok_or_else(|| StepDataError::workflow_not_found(identifier_or_internal_id))?;

        let step = workflow
            .find_step(step_id)
            .ok_or_else(|| StepDataError::step_not_found(identifier_or_internal_id, step_id))?;

        // Structural validation runs before the control values fetch so a
        // malformed record is reported without touching storage again.
        let complete = step
            .as_complete()
            .map_err(|missing| StepDataError::invalid_step(step_id, &missing))?;

        let query = ControlValuesQuery::step_controls(
            context.environment_id(),
            context.organization_id(),
            workflow.id(),
            complete.id,
        );
        let values = self
            .control_values_repository
            .find_one(&query)
            .await?
            .map(|record| record.into_controls())
            .unwrap_or_default();

        let variables = self.variable_schema_builder.build(VariableSchemaQuery {
            step_database_id: complete.id,
            workflow: &workflow,
        });

        let workflow_id = workflow
            .trigger_identifier()
            .ok_or_else(|| StepDataError::missing_trigger_identifier(workflow.id()))?;

        debug!(
            workflow_id = %workflow.id(),
            step_id = %complete.step_id,
            "Assembled step data"
        );

        Ok(StepData {
            controls: StepControls {
                data_schema: complete
                    .controls
                    .map(|c| c.schema.clone())
                    .unwrap_or_else(empty_object),
                ui_schema: complete
                    .controls
                    .map(|c| c.ui_schema.clone())
                    .unwrap_or_else(empty_object),
                values,
            },
            variables,
            name: complete.name.to_string(),
            id: complete.id.to_string(),
            step_id: complete.step_id.to_string(),
            step_type: complete.step_type,
            origin: workflow.origin_or_default(),
            workflow_id: workflow_id.to_string(),
            workflow_database_id: workflow.id().to_string(),
        })
    }

    /// Apply a partial update to a step and return the refreshed
    /// projection
    pub async fn patch(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
        step_id: &str,
        patch: PatchStepData,
    ) -> Result<StepData, StepDataError> {
        let lookup = WorkflowLookup::new(context, identifier_or_internal_id);
        let mut workflow = self
            .workflow_repository
            .find_by_identifier_or_id(&lookup)
            .await?
            .ok_or_else(|| StepDataError::workflow_not_found(identifier_or_internal_id))?;

        let position = workflow
            .steps()
            .iter()
            .position(|step| step.id() == Some(step_id) || step.step_id() == Some(step_id))
            .ok_or_else(|| StepDataError::step_not_found(identifier_or_internal_id, step_id))?;

        let step_database_id = workflow.steps()[position]
            .as_complete()
            .map_err(|missing| StepDataError::invalid_step(step_id, &missing))?
            .id
            .to_string();

        if let Some(name) = patch.name {
            let mut steps = workflow.steps().to_vec();
            steps[position].set_name(name);
            workflow.set_steps(steps);
            workflow = self.workflow_repository.update(workflow).await?;
        }

        if let Some(control_values) = patch.control_values {
            let query = ControlValuesQuery::step_controls(
                context.environment_id(),
                context.organization_id(),
                workflow.id(),
                &step_database_id,
            );
            self.control_values_repository
                .upsert(&query, control_values)
                .await?;
        }

        self.build(context, identifier_or_internal_id, step_id).await
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
