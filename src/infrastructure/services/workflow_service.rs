//! Workflow service - CRUD, search, environment sync and test data

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{
    ControlValuesQuery, ControlValuesRepository, DomainError, RequestContext, Step, StepTemplate,
    StepType, TriggerIdentifier, Workflow, WorkflowLookup, WorkflowOrigin, WorkflowPage,
    WorkflowRepository, WorkflowSearchQuery, WorkflowTrigger,
};

/// One step in a create/update command
#[derive(Debug, Clone)]
pub struct StepCommand {
    /// External step id; when present on update, the matching existing
    /// step keeps its internal id
    pub step_id: Option<String>,
    pub name: String,
    pub step_type: StepType,
    pub control_values: Option<Map<String, Value>>,
}

/// Command to create a new workflow
#[derive(Debug, Clone)]
pub struct CreateWorkflowCommand {
    /// Trigger identifier, the workflow's external handle
    pub identifier: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub active: bool,
    pub origin: Option<WorkflowOrigin>,
    pub steps: Vec<StepCommand>,
}

/// Command to fully replace a workflow definition
#[derive(Debug, Clone)]
pub struct UpdateWorkflowCommand {
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub active: bool,
    pub steps: Vec<StepCommand>,
}

/// Command to partially update workflow metadata
#[derive(Debug, Clone, Default)]
pub struct PatchWorkflowCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub active: Option<bool>,
}

/// Test event skeleton for a workflow: recipient fields required by its
/// channel steps plus the trigger payload shape
#[derive(Debug, Clone)]
pub struct WorkflowTestData {
    pub to: Value,
    pub payload: Value,
}

/// Workflow service for definition management
#[derive(Debug)]
pub struct WorkflowService {
    workflow_repository: Arc<dyn WorkflowRepository>,
    control_values_repository: Arc<dyn ControlValuesRepository>,
}

impl WorkflowService {
    pub fn new(
        workflow_repository: Arc<dyn WorkflowRepository>,
        control_values_repository: Arc<dyn ControlValuesRepository>,
    ) -> Self {
        Self {
            workflow_repository,
            control_values_repository,
        }
    }

    /// Get a workflow by trigger identifier or internal id
    pub async fn get(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
    ) -> Result<Option<Workflow>, DomainError> {
        let lookup = WorkflowLookup::new(context, identifier_or_internal_id);
        self.workflow_repository.find_by_identifier_or_id(&lookup).await
    }

    /// Create a new workflow with generated step identities
    pub async fn create(
        &self,
        context: &RequestContext,
        command: CreateWorkflowCommand,
    ) -> Result<Workflow, DomainError> {
        let identifier = TriggerIdentifier::new(&command.identifier)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_name(&command.name)?;
        validate_step_commands(&command.steps)?;

        let mut taken = HashSet::new();
        let mut steps = Vec::with_capacity(command.steps.len());
        let mut pending_values = Vec::new();

        for step_command in &command.steps {
            let step_id = claim_step_id(&mut taken, step_command);
            let internal_id = Uuid::new_v4().to_string();

            if let Some(values) = &step_command.control_values {
                pending_values.push((internal_id.clone(), values.clone()));
            }

            steps.push(Step::new(
                internal_id,
                step_id,
                step_command.name.clone(),
                StepTemplate::new(step_command.step_type),
            ));
        }

        let mut workflow = Workflow::new(
            Uuid::new_v4().to_string(),
            command.name,
            context.environment_id(),
            context.organization_id(),
        )
        .with_trigger(WorkflowTrigger::event(identifier))
        .with_origin(command.origin.unwrap_or(WorkflowOrigin::Native))
        .with_tags(command.tags)
        .with_active(command.active)
        .with_steps(steps);

        if let Some(description) = command.description {
            workflow = workflow.with_description(description);
        }

        let workflow = self.workflow_repository.create(workflow).await?;

        for (step_internal_id, values) in pending_values {
            let query = self.step_query(context, workflow.id(), &step_internal_id);
            self.control_values_repository.upsert(&query, values).await?;
        }

        info!(workflow_id = %workflow.id(), "Created workflow");
        Ok(workflow)
    }

    /// Fully replace a workflow definition.
    ///
    /// Steps are matched by external step id so surviving steps keep
    /// their internal ids; control values of removed steps are deleted.
    pub async fn update(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
        command: UpdateWorkflowCommand,
    ) -> Result<Workflow, DomainError> {
        validate_name(&command.name)?;
        validate_step_commands(&command.steps)?;

        let mut workflow = self
            .get(context, identifier_or_internal_id)
            .await?
            .ok_or_else(|| not_found(identifier_or_internal_id))?;

        let (steps, pending_values, removed_step_ids) =
            merge_steps(workflow.steps(), &command.steps);

        workflow.set_name(command.name);
        workflow.set_description(command.description);
        workflow.set_tags(command.tags);
        workflow.set_active(command.active);
        workflow.set_steps(steps);

        let workflow = self.workflow_repository.update(workflow).await?;

        for step_internal_id in removed_step_ids {
            let query = self.step_query(context, workflow.id(), &step_internal_id);
            self.control_values_repository.delete(&query).await?;
        }

        for (step_internal_id, values) in pending_values {
            let query = self.step_query(context, workflow.id(), &step_internal_id);
            self.control_values_repository.upsert(&query, values).await?;
        }

        debug!(workflow_id = %workflow.id(), "Updated workflow");
        Ok(workflow)
    }

    /// Partially update workflow metadata
    pub async fn patch(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
        command: PatchWorkflowCommand,
    ) -> Result<Workflow, DomainError> {
        let mut workflow = self
            .get(context, identifier_or_internal_id)
            .await?
            .ok_or_else(|| not_found(identifier_or_internal_id))?;

        if let Some(name) = command.name {
            validate_name(&name)?;
            workflow.set_name(name);
        }
        if let Some(description) = command.description {
            workflow.set_description(Some(description));
        }
        if let Some(tags) = command.tags {
            workflow.set_tags(tags);
        }
        if let Some(active) = command.active {
            workflow.set_active(active);
        }

        self.workflow_repository.update(workflow).await
    }

    /// Delete a workflow and the control values of all its steps
    pub async fn delete(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
    ) -> Result<bool, DomainError> {
        let Some(workflow) = self.get(context, identifier_or_internal_id).await? else {
            return Ok(false);
        };

        for step in workflow.steps() {
            if let Some(step_internal_id) = step.id() {
                let query = self.step_query(context, workflow.id(), step_internal_id);
                self.control_values_repository.delete(&query).await?;
            }
        }

        let deleted = self
            .workflow_repository
            .delete(context.environment_id(), workflow.id())
            .await?;

        if deleted {
            info!(workflow_id = %workflow.id(), "Deleted workflow");
        }
        Ok(deleted)
    }

    /// Paginated search within the caller's environment
    pub async fn search(
        &self,
        query: &WorkflowSearchQuery,
    ) -> Result<WorkflowPage, DomainError> {
        self.workflow_repository.search(query).await
    }

    /// Copy a workflow into another environment.
    ///
    /// Creates the workflow there if its identifier is unknown, replaces
    /// its definition otherwise, and carries each step's control values
    /// along. The synced copy is marked external since it no longer
    /// originates in the target environment's dashboard.
    pub async fn sync(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
        target_environment_id: &str,
    ) -> Result<Workflow, DomainError> {
        if target_environment_id == context.environment_id() {
            return Err(DomainError::validation(
                "Cannot sync a workflow into its own environment",
            ));
        }

        let source = self
            .get(context, identifier_or_internal_id)
            .await?
            .ok_or_else(|| not_found(identifier_or_internal_id))?;

        let identifier = source.trigger_identifier().ok_or_else(|| {
            DomainError::validation(format!(
                "Workflow '{}' has no trigger identifier to sync by",
                source.id()
            ))
        })?;

        let target_lookup = WorkflowLookup {
            identifier_or_internal_id: identifier.to_string(),
            environment_id: target_environment_id.to_string(),
            organization_id: context.organization_id().to_string(),
            user_id: context.user_id().to_string(),
        };
        let existing = self
            .workflow_repository
            .find_by_identifier_or_id(&target_lookup)
            .await?;

        // Source steps become commands so the same merge rules apply as
        // on update, then templates are restored from the source.
        let mut id_pairs = Vec::new();
        let target = match existing {
            Some(mut target) => {
                let merged = clone_steps(source.steps(), target.steps(), &mut id_pairs);
                target.set_name(source.name().to_string());
                target.set_description(source.description().map(String::from));
                target.set_tags(source.tags().to_vec());
                target.set_active(source.is_active());
                target.set_origin(WorkflowOrigin::External);
                target.set_steps(merged);
                self.workflow_repository.update(target).await?
            }
            None => {
                let merged = clone_steps(source.steps(), &[], &mut id_pairs);
                let mut target = Workflow::new(
                    Uuid::new_v4().to_string(),
                    source.name(),
                    target_environment_id,
                    context.organization_id(),
                )
                .with_trigger(WorkflowTrigger::event(
                    TriggerIdentifier::new(identifier)
                        .map_err(|e| DomainError::validation(e.to_string()))?,
                ))
                .with_origin(WorkflowOrigin::External)
                .with_tags(source.tags().to_vec())
                .with_active(source.is_active())
                .with_steps(merged);

                if let Some(description) = source.description() {
                    target = target.with_description(description);
                }
                self.workflow_repository.create(target).await?
            }
        };

        for (source_step_id, target_step_id) in id_pairs {
            let source_query = self.step_query(context, source.id(), &source_step_id);
            if let Some(record) = self.control_values_repository.find_one(&source_query).await? {
                let target_query = ControlValuesQuery::step_controls(
                    target_environment_id,
                    context.organization_id(),
                    target.id(),
                    &target_step_id,
                );
                self.control_values_repository
                    .upsert(&target_query, record.into_controls())
                    .await?;
            }
        }

        info!(
            workflow_id = %target.id(),
            target_environment_id = %target_environment_id,
            "Synced workflow"
        );
        Ok(target)
    }

    /// Build the test event skeleton for a workflow
    pub async fn test_data(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
    ) -> Result<WorkflowTestData, DomainError> {
        let workflow = self
            .get(context, identifier_or_internal_id)
            .await?
            .ok_or_else(|| not_found(identifier_or_internal_id))?;

        let step_types: HashSet<StepType> = workflow
            .steps()
            .iter()
            .filter_map(|step| step.template().map(|t| t.step_type()))
            .collect();

        let mut to_properties = Map::new();
        to_properties.insert("subscriberId".to_string(), json!({ "type": "string" }));

        if step_types.contains(&StepType::Email) {
            to_properties.insert(
                "email".to_string(),
                json!({ "type": "string", "format": "email" }),
            );
        }
        if step_types.contains(&StepType::Sms) || step_types.contains(&StepType::Push) {
            to_properties.insert("phone".to_string(), json!({ "type": "string" }));
        }

        Ok(WorkflowTestData {
            to: json!({
                "type": "object",
                "properties": Value::Object(to_properties),
                "required": ["subscriberId"]
            }),
            payload: json!({
                "type": "object",
                "additionalProperties": true
            }),
        })
    }

    fn step_query(
        &self,
        context: &RequestContext,
        workflow_id: &str,
        step_internal_id: &str,
    ) -> ControlValuesQuery {
        ControlValuesQuery::step_controls(
            context.environment_id(),
            context.organization_id(),
            workflow_id,
            step_internal_id,
        )
    }
}

fn not_found(identifier_or_internal_id: &str) -> DomainError {
    DomainError::not_found(format!(
        "Workflow '{}' not found",
        identifier_or_internal_id
    ))
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Workflow name cannot be empty"));
    }
    Ok(())
}

fn validate_step_commands(steps: &[StepCommand]) -> Result<(), DomainError> {
    for step in steps {
        if step.name.trim().is_empty() {
            return Err(DomainError::validation("Step name cannot be empty"));
        }
    }
    Ok(())
}

/// Derive an external step id from the display name
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "step".to_string()
    } else {
        slug
    }
}

/// Pick the external id for a step command, de-duplicating within the
/// workflow
fn claim_step_id(taken: &mut HashSet<String>, command: &StepCommand) -> String {
    let base = command
        .step_id
        .clone()
        .unwrap_or_else(|| slugify(&command.name));

    let mut candidate = base.clone();
    let mut suffix = 1;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    candidate
}

/// Merge step commands against existing steps.
///
/// Returns the new step list, the (internal id, values) pairs to upsert,
/// and the internal ids of removed steps.
#[allow(clippy::type_complexity)]
fn merge_steps(
    existing: &[Step],
    commands: &[StepCommand],
) -> (
    Vec<Step>,
    Vec<(String, Map<String, Value>)>,
    Vec<String>,
) {
    let mut taken = HashSet::new();
    let mut steps = Vec::with_capacity(commands.len());
    let mut pending_values = Vec::new();
    let mut kept_internal_ids = HashSet::new();

    for command in commands {
        let step_id = claim_step_id(&mut taken, command);

        let surviving = existing
            .iter()
            .find(|step| step.step_id() == Some(step_id.as_str()));

        let internal_id = match surviving.and_then(|step| step.id()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        kept_internal_ids.insert(internal_id.clone());

        if let Some(values) = &command.control_values {
            pending_values.push((internal_id.clone(), values.clone()));
        }

        // A surviving step keeps its template (and with it any control
        // schemas) unless the channel type changed.
        let template = match surviving.and_then(|step| step.template()) {
            Some(template) if template.step_type() == command.step_type => template.clone(),
            _ => StepTemplate::new(command.step_type),
        };

        steps.push(Step::new(
            internal_id,
            step_id,
            command.name.clone(),
            template,
        ));
    }

    let removed = existing
        .iter()
        .filter_map(|step| step.id())
        .filter(|id| !kept_internal_ids.contains(*id))
        .map(String::from)
        .collect();

    (steps, pending_values, removed)
}

/// Clone source steps into a target workflow, preserving the target's
/// internal ids where external step ids match. Records the
/// (source internal id, target internal id) pairs for control values
/// copying.
fn clone_steps(
    source: &[Step],
    target_existing: &[Step],
    id_pairs: &mut Vec<(String, String)>,
) -> Vec<Step> {
    let mut steps = Vec::with_capacity(source.len());

    for step in source {
        let (Some(source_id), Some(step_id), Some(name), Some(template)) =
            (step.id(), step.step_id(), step.name(), step.template())
        else {
            continue;
        };

        let target_id = target_existing
            .iter()
            .find(|existing| existing.step_id() == Some(step_id))
            .and_then(|existing| existing.id())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        id_pairs.push((source_id.to_string(), target_id.clone()));
        steps.push(Step::new(target_id, step_id, name, template.clone()));
    }

    steps
}
