//! Control values record entity

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Scope discriminator for control values
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ControlValuesLevel {
    /// Values configured on a single step
    #[default]
    StepControls,

    /// Values configured on the workflow as a whole
    WorkflowControls,
}

/// User-configured control values for one step (or workflow), keyed by
/// (environment, organization, workflow, step, level).
///
/// Zero or one record exists per key tuple; absence is valid and means
/// no values were saved yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlValuesRecord {
    environment_id: String,
    organization_id: String,
    workflow_id: String,
    step_id: String,
    level: ControlValuesLevel,
    controls: Map<String, Value>,
}

impl ControlValuesRecord {
    pub fn new(
        environment_id: impl Into<String>,
        organization_id: impl Into<String>,
        workflow_id: impl Into<String>,
        step_id: impl Into<String>,
        level: ControlValuesLevel,
        controls: Map<String, Value>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            organization_id: organization_id.into(),
            workflow_id: workflow_id.into(),
            step_id: step_id.into(),
            level,
            controls,
        }
    }

    pub fn environment_id(&self) -> &str {
        &self.environment_id
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn step_id(&self) -> &str {
        &self.step_id
    }

    pub fn level(&self) -> ControlValuesLevel {
        self.level
    }

    pub fn controls(&self) -> &Map<String, Value> {
        &self.controls
    }

    pub fn into_controls(self) -> Map<String, Value> {
        self.controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_serialization() {
        assert_eq!(
            serde_json::to_string(&ControlValuesLevel::StepControls).unwrap(),
            "\"step_controls\""
        );
        assert_eq!(
            serde_json::to_string(&ControlValuesLevel::WorkflowControls).unwrap(),
            "\"workflow_controls\""
        );
    }

    #[test]
    fn test_record_accessors() {
        let mut controls = Map::new();
        controls.insert("subject".to_string(), json!("Welcome!"));

        let record = ControlValuesRecord::new(
            "env-1",
            "org-1",
            "w1",
            "s1",
            ControlValuesLevel::StepControls,
            controls,
        );

        assert_eq!(record.workflow_id(), "w1");
        assert_eq!(record.step_id(), "s1");
        assert_eq!(record.level(), ControlValuesLevel::StepControls);
        assert_eq!(record.controls().get("subject"), Some(&json!("Welcome!")));
    }
}
