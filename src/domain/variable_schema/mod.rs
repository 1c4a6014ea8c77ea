//! Variable schema builder contract
//!
//! Derives the set of template variables (payload fields, subscriber
//! fields, upstream step outputs) valid within a given step. Consumed by
//! the step-data assembler as a pure function.

use serde_json::Value;

use crate::domain::workflow::Workflow;

/// Input to the variable schema builder
#[derive(Debug, Clone, Copy)]
pub struct VariableSchemaQuery<'a> {
    /// Internal id of the step the schema is derived for
    pub step_database_id: &'a str,

    /// The owning workflow, including all steps
    pub workflow: &'a Workflow,
}

/// Builds the schema of template variables available to a step.
///
/// Implementations must be pure: no side effects, no I/O beyond what the
/// builder itself owns, and safe to call concurrently.
pub trait VariableSchemaBuilder: Send + Sync + std::fmt::Debug {
    fn build(&self, query: VariableSchemaQuery<'_>) -> Value;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Mock builder returning a fixed schema
    #[derive(Debug)]
    pub struct FixedVariableSchemaBuilder {
        schema: Value,
    }

    impl FixedVariableSchemaBuilder {
        pub fn new(schema: Value) -> Self {
            Self { schema }
        }
    }

    impl Default for FixedVariableSchemaBuilder {
        fn default() -> Self {
            Self::new(serde_json::json!({ "type": "object" }))
        }
    }

    impl VariableSchemaBuilder for FixedVariableSchemaBuilder {
        fn build(&self, _query: VariableSchemaQuery<'_>) -> Value {
            self.schema.clone()
        }
    }
}
