//! Variable schema builder implementations

mod step_schema_builder;

pub use step_schema_builder::StepVariableSchemaBuilder;
