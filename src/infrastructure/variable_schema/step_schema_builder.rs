//! Variable schema derivation from the workflow step graph

use serde_json::{json, Map, Value};

use crate::domain::{Step, StepType, VariableSchemaBuilder, VariableSchemaQuery};

/// Derives the template variables available to a step: subscriber
/// attributes, the trigger payload, and outputs of upstream action
/// steps (digest/delay).
#[derive(Debug, Default)]
pub struct StepVariableSchemaBuilder;

impl StepVariableSchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    fn subscriber_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "subscriberId": { "type": "string" },
                "firstName": { "type": "string" },
                "lastName": { "type": "string" },
                "email": { "type": "string" },
                "phone": { "type": "string" },
                "avatar": { "type": "string" },
                "locale": { "type": "string" }
            },
            "required": ["subscriberId"]
        })
    }

    fn payload_schema() -> Value {
        json!({
            "type": "object",
            "additionalProperties": true
        })
    }

    /// Output schema of one upstream action step, or None for steps that
    /// produce no referenceable output
    fn step_output_schema(step_type: StepType) -> Option<Value> {
        match step_type {
            StepType::Digest => Some(json!({
                "type": "object",
                "properties": {
                    "eventCount": { "type": "number" },
                    "events": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": { "type": "string" },
                                "time": { "type": "string" },
                                "payload": { "type": "object", "additionalProperties": true }
                            }
                        }
                    }
                }
            })),
            StepType::Delay => Some(json!({
                "type": "object",
                "properties": {
                    "duration": { "type": "number" }
                }
            })),
            _ => None,
        }
    }

    /// Steps strictly before the target step in sequence order
    fn upstream_steps<'a>(steps: &'a [Step], step_database_id: &str) -> &'a [Step] {
        let position = steps
            .iter()
            .position(|step| step.id() == Some(step_database_id));

        match position {
            Some(index) => &steps[..index],
            None => &[],
        }
    }
}

impl VariableSchemaBuilder for StepVariableSchemaBuilder {
    fn build(&self, query: VariableSchemaQuery<'_>) -> Value {
        let mut step_properties = Map::new();

        for step in Self::upstream_steps(query.workflow.steps(), query.step_database_id) {
            let Some(step_id) = step.step_id() else {
                continue;
            };
            let Some(template) = step.template() else {
                continue;
            };

            if let Some(schema) = Self::step_output_schema(template.step_type()) {
                step_properties.insert(step_id.to_string(), schema);
            }
        }

        let mut properties = Map::new();
        properties.insert("subscriber".to_string(), Self::subscriber_schema());
        properties.insert("payload".to_string(), Self::payload_schema());

        if !step_properties.is_empty() {
            properties.insert(
                "steps".to_string(),
                json!({
                    "type": "object",
                    "properties": Value::Object(step_properties)
                }),
            );
        }

        json!({
            "type": "object",
            "properties": Value::Object(properties),
            "additionalProperties": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StepTemplate, Workflow};

    fn step(id: &str, step_id: &str, step_type: StepType) -> Step {
        Step::new(id, step_id, step_id, StepTemplate::new(step_type))
    }

    fn build(workflow: &Workflow, step_database_id: &str) -> Value {
        StepVariableSchemaBuilder::new().build(VariableSchemaQuery {
            step_database_id,
            workflow,
        })
    }

    #[test]
    fn test_first_step_sees_no_step_outputs() {
        let workflow = Workflow::new("w1", "Test", "env-1", "org-1")
            .with_step(step("s1", "send-email", StepType::Email));

        let schema = build(&workflow, "s1");

        assert!(schema["properties"]["subscriber"].is_object());
        assert!(schema["properties"]["payload"].is_object());
        assert!(schema["properties"].get("steps").is_none());
    }

    #[test]
    fn test_digest_output_visible_downstream() {
        let workflow = Workflow::new("w1", "Test", "env-1", "org-1")
            .with_step(step("s1", "daily-digest", StepType::Digest))
            .with_step(step("s2", "send-email", StepType::Email));

        let schema = build(&workflow, "s2");

        let steps = &schema["properties"]["steps"]["properties"];
        assert!(steps["daily-digest"]["properties"]["events"].is_object());
        assert!(steps["daily-digest"]["properties"]["eventCount"].is_object());
    }

    #[test]
    fn test_channel_steps_produce_no_output() {
        let workflow = Workflow::new("w1", "Test", "env-1", "org-1")
            .with_step(step("s1", "send-sms", StepType::Sms))
            .with_step(step("s2", "send-email", StepType::Email));

        let schema = build(&workflow, "s2");
        assert!(schema["properties"].get("steps").is_none());
    }

    #[test]
    fn test_downstream_steps_not_visible() {
        let workflow = Workflow::new("w1", "Test", "env-1", "org-1")
            .with_step(step("s1", "send-email", StepType::Email))
            .with_step(step("s2", "daily-digest", StepType::Digest));

        let schema = build(&workflow, "s1");
        assert!(schema["properties"].get("steps").is_none());
    }

    #[test]
    fn test_unknown_step_sees_no_step_outputs() {
        let workflow = Workflow::new("w1", "Test", "env-1", "org-1")
            .with_step(step("s1", "daily-digest", StepType::Digest));

        let schema = build(&workflow, "ghost");
        assert!(schema["properties"].get("steps").is_none());
    }
}
