//! Step preview rendering
//!
//! Renders a step's control values against a sample payload by
//! substituting `{{path.to.variable}}` template references, and reports
//! which references the controls use.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{
    ControlValuesQuery, ControlValuesRepository, RequestContext, StepDataError, StepType,
    WorkflowLookup, WorkflowRepository,
};

/// Template reference: dotted path inside double curly braces
static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([a-zA-Z0-9_][a-zA-Z0-9_.-]*)\s*\}\}").unwrap());

/// Request to render a preview of one step
#[derive(Debug, Clone, Default)]
pub struct GeneratePreviewCommand {
    /// Control values to render; stored values are used when absent
    pub control_values: Option<Map<String, Value>>,

    /// Sample variable root ({"payload": ..., "subscriber": ...})
    pub preview_payload: Option<Value>,
}

/// Rendered preview of one step
#[derive(Debug, Clone)]
pub struct PreviewResult {
    pub step_type: StepType,

    /// Control values with template references substituted
    pub preview: Value,

    /// Skeleton of the variable paths the controls reference
    pub preview_payload_example: Value,
}

/// Renders step previews for the dashboard editor
#[derive(Debug)]
pub struct PreviewService {
    workflow_repository: Arc<dyn WorkflowRepository>,
    control_values_repository: Arc<dyn ControlValuesRepository>,
}

impl PreviewService {
    pub fn new(
        workflow_repository: Arc<dyn WorkflowRepository>,
        control_values_repository: Arc<dyn ControlValuesRepository>,
    ) -> Self {
        Self {
            workflow_repository,
            control_values_repository,
        }
    }

    pub async fn generate(
        &self,
        context: &RequestContext,
        identifier_or_internal_id: &str,
        step_id: &str,
        command: GeneratePreviewCommand,
    ) -> Result<PreviewResult, StepDataError> {
        let lookup = WorkflowLookup::new(context, identifier_or_internal_id);
        let workflow = self
            .workflow_repository
            .find_by_identifier_or_id(&lookup)
            .await?
            .ok_or_else(|| StepDataError::workflow_not_found(identifier_or_internal_id))?;

        let step = workflow
            .find_step(step_id)
            .ok_or_else(|| StepDataError::step_not_found(identifier_or_internal_id, step_id))?;
        let complete = step
            .as_complete()
            .map_err(|missing| StepDataError::invalid_step(step_id, &missing))?;

        let control_values = match command.control_values {
            Some(values) => values,
            None => {
                let query = ControlValuesQuery::step_controls(
                    context.environment_id(),
                    context.organization_id(),
                    workflow.id(),
                    complete.id,
                );
                self.control_values_repository
                    .find_one(&query)
                    .await?
                    .map(|record| record.into_controls())
                    .unwrap_or_default()
            }
        };

        let root = command.preview_payload.unwrap_or(Value::Null);
        let mut referenced = Vec::new();
        let preview = render_value(&Value::Object(control_values), &root, &mut referenced);

        let mut example = Value::Object(Map::new());
        for path in &referenced {
            let value = resolve_path(&root, path)
                .cloned()
                .unwrap_or_else(|| Value::String(format!("{{{{{}}}}}", path)));
            insert_path(&mut example, path, value);
        }

        debug!(
            workflow_id = %workflow.id(),
            step_id = %complete.step_id,
            references = referenced.len(),
            "Rendered step preview"
        );

        Ok(PreviewResult {
            step_type: complete.step_type,
            preview,
            preview_payload_example: example,
        })
    }
}

/// Substitute template references in every string of a JSON tree,
/// collecting the referenced paths
fn render_value(value: &Value, root: &Value, referenced: &mut Vec<String>) -> Value {
    match value {
        Value::String(text) => Value::String(render_string(text, root, referenced)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_value(item, root, referenced))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), render_value(item, root, referenced)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn render_string(template: &str, root: &Value, referenced: &mut Vec<String>) -> String {
    let mut result = template.to_string();

    for caps in VARIABLE_PATTERN.captures_iter(template) {
        let full_match = caps.get(0).unwrap().as_str();
        let path = caps.get(1).unwrap().as_str();

        if !referenced.iter().any(|seen| seen == path) {
            referenced.push(path.to_string());
        }

        // Unresolvable references stay in place so the editor shows them
        if let Some(resolved) = resolve_path(root, path) {
            result = result.replace(full_match, &value_to_string(resolved));
        }
    }

    result
}

/// Walk a dotted path into a JSON tree
fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Insert a value at a dotted path, creating intermediate objects
fn insert_path(target: &mut Value, path: &str, value: Value) {
    let mut current = target;
    let segments: Vec<&str> = path.split('.').collect();

    for (index, segment) in segments.iter().enumerate() {
        let map = match current {
            Value::Object(map) => map,
            _ => return,
        };

        if index == segments.len() - 1 {
            map.insert(segment.to_string(), value);
            return;
        }

        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
