//! Request context scoping every lookup

/// Identifiers for the acting environment, organization and user.
///
/// Supplied by the caller on every request and never persisted. All
/// repository lookups are scoped by these identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    environment_id: String,
    organization_id: String,
    user_id: String,
}

impl RequestContext {
    pub fn new(
        environment_id: impl Into<String>,
        organization_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            organization_id: organization_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn environment_id(&self) -> &str {
        &self.environment_id
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
