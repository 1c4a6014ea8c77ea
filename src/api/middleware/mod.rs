//! Request context extraction
//!
//! Authentication itself lives in front of this service; by the time a
//! request arrives the gateway has stamped the acting environment,
//! organization and user onto headers. The extractor only requires
//! their presence.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::api::types::ApiError;
use crate::domain::RequestContext;

pub const ENVIRONMENT_HEADER: &str = "x-environment-id";
pub const ORGANIZATION_HEADER: &str = "x-organization-id";
pub const USER_HEADER: &str = "x-user-id";

/// Extractor that requires the scoping headers on every request
#[derive(Debug, Clone)]
pub struct RequireContext(pub RequestContext);

impl<S> FromRequestParts<S> for RequireContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let environment_id = required_header(parts, ENVIRONMENT_HEADER)?;
        let organization_id = required_header(parts, ORGANIZATION_HEADER)?;
        let user_id = required_header(parts, USER_HEADER)?;

        debug!(
            environment_id = %environment_id,
            organization_id = %organization_id,
            "Resolved request context"
        );

        Ok(RequireContext(RequestContext::new(
            environment_id,
            organization_id,
            user_id,
        )))
    }
}

fn required_header(parts: &Parts, name: &str) -> Result<String, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(String::from)
        .ok_or_else(|| ApiError::unauthorized(format!("Missing {} header", name)))
}
