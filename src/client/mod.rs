//! REST client facade
//!
//! Typed wrappers over the workflow v2 API for front-end and SDK code.
//! Non-2xx responses come back as values in a [`RestResult`] envelope;
//! only transport failures are errors.

mod http;
mod workflows;

pub use http::{ClientError, HttpError, RestClient, RestResult};
pub use workflows::WorkflowsClient;
