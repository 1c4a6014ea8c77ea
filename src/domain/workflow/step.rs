//! Notification step entity and template types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel or action type of a notification step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Email,
    InApp,
    Sms,
    Push,
    Chat,
    Delay,
    Digest,
    Custom,
}

impl StepType {
    /// Get a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::InApp => "in_app",
            Self::Sms => "sms",
            Self::Push => "push",
            Self::Chat => "chat",
            Self::Delay => "delay",
            Self::Digest => "digest",
            Self::Custom => "custom",
        }
    }

    /// True for steps that deliver to a channel (as opposed to action
    /// steps like delay and digest)
    pub fn is_channel(&self) -> bool {
        matches!(
            self,
            Self::Email | Self::InApp | Self::Sms | Self::Push | Self::Chat
        )
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Control schemas attached to a step template: the JSON data schema
/// describing valid control values and the UI schema describing how the
/// dashboard renders the editing form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ControlSchema {
    pub schema: Value,
    pub ui_schema: Value,
}

impl ControlSchema {
    pub fn new(schema: Value, ui_schema: Value) -> Self {
        Self { schema, ui_schema }
    }
}

/// Template backing a step: the channel type plus optional control
/// schemas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepTemplate {
    step_type: StepType,
    #[serde(skip_serializing_if = "Option::is_none")]
    controls: Option<ControlSchema>,
}

impl StepTemplate {
    pub fn new(step_type: StepType) -> Self {
        Self {
            step_type,
            controls: None,
        }
    }

    pub fn with_controls(mut self, controls: ControlSchema) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn step_type(&self) -> StepType {
        self.step_type
    }

    pub fn controls(&self) -> Option<&ControlSchema> {
        self.controls.as_ref()
    }
}

/// One stage in a workflow.
///
/// Fields are optional because persisted records can be partial; a step
/// is usable only once [`Step::as_complete`] succeeds.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Step {
    /// Internal database identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    /// External step identifier, unique within the workflow
    #[serde(skip_serializing_if = "Option::is_none")]
    step_id: Option<String>,

    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Backing template
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<StepTemplate>,
}

/// Borrowed view of a step whose required fields are all present.
///
/// Obtained via [`Step::as_complete`]; downstream code can read the
/// fields without re-checking for absence.
#[derive(Debug, Clone, Copy)]
pub struct CompleteStep<'a> {
    pub id: &'a str,
    pub step_id: &'a str,
    pub name: &'a str,
    pub step_type: StepType,
    pub controls: Option<&'a ControlSchema>,
}

impl Step {
    /// Create a step with all required fields present
    pub fn new(
        id: impl Into<String>,
        step_id: impl Into<String>,
        name: impl Into<String>,
        template: StepTemplate,
    ) -> Self {
        Self {
            id: Some(id.into()),
            step_id: Some(step_id.into()),
            name: Some(name.into()),
            template: Some(template),
        }
    }

    /// Create an empty step record; used to model partial persisted data
    pub fn empty() -> Self {
        Self::default()
    }

    // Builder methods

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_step_id(mut self, step_id: impl Into<String>) -> Self {
        self.step_id = Some(step_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_template(mut self, template: StepTemplate) -> Self {
        self.template = Some(template);
        self
    }

    // Getters

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn step_id(&self) -> Option<&str> {
        self.step_id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn template(&self) -> Option<&StepTemplate> {
        self.template.as_ref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Validate completeness: name, internal id, external step id and
    /// template type must all be present.
    ///
    /// Returns the names of the missing fields on failure. Absence of
    /// any of them is a data-integrity fault in the persisted record,
    /// not a recoverable default.
    pub fn as_complete(&self) -> Result<CompleteStep<'_>, Vec<&'static str>> {
        let mut missing = Vec::new();

        if self.name.as_deref().is_none_or(str::is_empty) {
            missing.push("name");
        }
        if self.id.as_deref().is_none_or(str::is_empty) {
            missing.push("id");
        }
        if self.step_id.as_deref().is_none_or(str::is_empty) {
            missing.push("stepId");
        }
        if self.template.is_none() {
            missing.push("type");
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        let template = self.template.as_ref().unwrap();
        Ok(CompleteStep {
            id: self.id.as_deref().unwrap(),
            step_id: self.step_id.as_deref().unwrap(),
            name: self.name.as_deref().unwrap(),
            step_type: template.step_type(),
            controls: template.controls(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_type_serialization() {
        assert_eq!(serde_json::to_string(&StepType::Email).unwrap(), "\"email\"");
        assert_eq!(serde_json::to_string(&StepType::InApp).unwrap(), "\"in_app\"");
        assert_eq!(serde_json::to_string(&StepType::Sms).unwrap(), "\"sms\"");
    }

    #[test]
    fn test_step_type_channel_classification() {
        assert!(StepType::Email.is_channel());
        assert!(StepType::Push.is_channel());
        assert!(!StepType::Delay.is_channel());
        assert!(!StepType::Digest.is_channel());
    }

    #[test]
    fn test_complete_step() {
        let template = StepTemplate::new(StepType::Email)
            .with_controls(ControlSchema::new(json!({}), json!({})));
        let step = Step::new("s1", "send-email", "Send Email", template);

        let complete = step.as_complete().unwrap();
        assert_eq!(complete.id, "s1");
        assert_eq!(complete.step_id, "send-email");
        assert_eq!(complete.name, "Send Email");
        assert_eq!(complete.step_type, StepType::Email);
        assert!(complete.controls.is_some());
    }

    #[test]
    fn test_incomplete_step_reports_missing_fields() {
        let step = Step::empty().with_name("Only Name");

        let missing = step.as_complete().unwrap_err();
        assert_eq!(missing, vec!["id", "stepId", "type"]);
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let step = Step::new("s1", "", "Send Email", StepTemplate::new(StepType::Email));

        let missing = step.as_complete().unwrap_err();
        assert_eq!(missing, vec!["stepId"]);
    }

    #[test]
    fn test_step_without_template() {
        let step = Step::empty()
            .with_id("s1")
            .with_step_id("send-email")
            .with_name("Send Email");

        let missing = step.as_complete().unwrap_err();
        assert_eq!(missing, vec!["type"]);
    }

    #[test]
    fn test_step_serialization_skips_absent_fields() {
        let step = Step::empty().with_name("Partial");
        let json = serde_json::to_string(&step).unwrap();

        assert!(json.contains("\"name\":\"Partial\""));
        assert!(!json.contains("step_id"));
        assert!(!json.contains("template"));
    }
}
