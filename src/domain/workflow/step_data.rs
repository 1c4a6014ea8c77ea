//! Assembled step data projection

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::WorkflowOrigin;
use super::step::StepType;

/// Control schemas and current values for one step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepControls {
    /// JSON schema describing valid control values
    pub data_schema: Value,

    /// UI schema describing how the dashboard renders the editor
    pub ui_schema: Value,

    /// User-configured control values; empty when none were saved
    pub values: Map<String, Value>,
}

/// Read-only projection combining a step, its control values and the
/// variable schema derived for it.
///
/// Constructed fresh per request; has no independent persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepData {
    pub controls: StepControls,

    /// Schema of template variables valid within this step
    pub variables: Value,

    /// Step display name
    pub name: String,

    /// Step internal id
    #[serde(rename = "_id")]
    pub id: String,

    /// Step external id
    pub step_id: String,

    /// Channel or action type
    #[serde(rename = "type")]
    pub step_type: StepType,

    /// Authoring origin of the owning workflow
    pub origin: WorkflowOrigin,

    /// External identifier of the owning workflow (its first trigger)
    pub workflow_id: String,

    /// Internal id of the owning workflow
    pub workflow_database_id: String,
}
