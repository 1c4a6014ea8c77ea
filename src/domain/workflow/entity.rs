//! Workflow domain entity

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::WorkflowError;
use super::step::Step;

/// Maximum length for trigger identifiers
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Regex pattern for valid trigger identifiers: alphanumeric with hyphens
/// and underscores, starting and ending with an alphanumeric character
static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$").unwrap()
});

/// Validated trigger identifier, the human-readable handle of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerIdentifier(String);

impl TriggerIdentifier {
    /// Create a new validated trigger identifier
    pub fn new(identifier: impl Into<String>) -> Result<Self, WorkflowError> {
        let identifier = identifier.into();
        validate_trigger_identifier(&identifier)?;
        Ok(Self(identifier))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TriggerIdentifier {
    type Error = WorkflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TriggerIdentifier> for String {
    fn from(identifier: TriggerIdentifier) -> Self {
        identifier.0
    }
}

impl fmt::Display for TriggerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TriggerIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a trigger identifier string
pub fn validate_trigger_identifier(identifier: &str) -> Result<(), WorkflowError> {
    if identifier.is_empty() {
        return Err(WorkflowError::validation(
            "Trigger identifier cannot be empty",
        ));
    }

    if identifier.len() > MAX_IDENTIFIER_LENGTH {
        return Err(WorkflowError::validation(format!(
            "Trigger identifier exceeds maximum length of {} characters",
            MAX_IDENTIFIER_LENGTH
        )));
    }

    if !IDENTIFIER_PATTERN.is_match(identifier) {
        return Err(WorkflowError::validation(format!(
            "Invalid trigger identifier '{}': must be alphanumeric with hyphens or underscores, start and end with alphanumeric",
            identifier
        )));
    }

    Ok(())
}

/// How a workflow gets triggered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    #[default]
    Event,
}

/// A trigger attached to a workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowTrigger {
    trigger_type: TriggerType,
    identifier: TriggerIdentifier,
}

impl WorkflowTrigger {
    /// Create a new event trigger with the given identifier
    pub fn event(identifier: TriggerIdentifier) -> Self {
        Self {
            trigger_type: TriggerType::Event,
            identifier,
        }
    }

    pub fn trigger_type(&self) -> TriggerType {
        self.trigger_type
    }

    pub fn identifier(&self) -> &TriggerIdentifier {
        &self.identifier
    }
}

/// Where a workflow was authored
///
/// `External` workflows are defined in user code and synced in;
/// `Native` workflows are authored in the product dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOrigin {
    #[default]
    External,
    Native,
}

/// A workflow definition: an ordered sequence of notification steps
/// fired by a trigger, scoped to one environment and organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Internal database identifier
    id: String,

    /// Human-readable name
    name: String,

    /// Where the workflow was authored; absent on legacy records
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<WorkflowOrigin>,

    /// Triggers that start this workflow; the first trigger's identifier
    /// is the workflow's external handle
    triggers: Vec<WorkflowTrigger>,

    /// Ordered list of notification steps
    steps: Vec<Step>,

    /// Owning environment
    environment_id: String,

    /// Owning organization
    organization_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default)]
    tags: Vec<String>,

    /// Inactive workflows are kept but not triggerable
    active: bool,

    created_at: DateTime<Utc>,

    updated_at: DateTime<Utc>,
}

impl Workflow {
    /// Create a new workflow scoped to an environment and organization
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        environment_id: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            origin: None,
            triggers: Vec::new(),
            steps: Vec::new(),
            environment_id: environment_id.into(),
            organization_id: organization_id.into(),
            description: None,
            tags: Vec::new(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    // Builder methods

    pub fn with_origin(mut self, origin: WorkflowOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_trigger(mut self, trigger: WorkflowTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    // Getters

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> Option<WorkflowOrigin> {
        self.origin
    }

    /// Origin with the unset case collapsed to the least-trusted category
    pub fn origin_or_default(&self) -> WorkflowOrigin {
        self.origin.unwrap_or_default()
    }

    pub fn triggers(&self) -> &[WorkflowTrigger] {
        &self.triggers
    }

    /// Identifier of the first trigger, the workflow's external handle
    pub fn trigger_identifier(&self) -> Option<&str> {
        self.triggers.first().map(|t| t.identifier().as_str())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn environment_id(&self) -> &str {
        &self.environment_id
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Find a step by its internal id or external step id.
    ///
    /// Scans the ordered step sequence; the first match wins. Ids are
    /// expected to be unique within a workflow, so order does not
    /// normally matter.
    pub fn find_step(&self, step_id: &str) -> Option<&Step> {
        self.steps
            .iter()
            .find(|step| step.id() == Some(step_id) || step.step_id() == Some(step_id))
    }

    /// True when the given value matches the internal id or any trigger
    /// identifier
    pub fn matches_identifier_or_id(&self, identifier_or_id: &str) -> bool {
        self.id == identifier_or_id
            || self
                .triggers
                .iter()
                .any(|t| t.identifier().as_str() == identifier_or_id)
    }

    // Setters (mutate and update timestamp)

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
        self.touch();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.touch();
    }

    pub fn set_origin(&mut self, origin: WorkflowOrigin) {
        self.origin = Some(origin);
        self.touch();
    }

    pub fn set_steps(&mut self, steps: Vec<Step>) {
        self.steps = steps;
        self.touch();
    }

    pub fn set_environment_id(&mut self, environment_id: impl Into<String>) {
        self.environment_id = environment_id.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
