//! Workflow repository trait

use async_trait::async_trait;

use super::entity::Workflow;
use crate::domain::context::RequestContext;
use crate::domain::DomainError;

/// Scoped workflow lookup by external identifier or internal id
#[derive(Debug, Clone)]
pub struct WorkflowLookup {
    pub identifier_or_internal_id: String,
    pub environment_id: String,
    pub organization_id: String,
    pub user_id: String,
}

impl WorkflowLookup {
    pub fn new(context: &RequestContext, identifier_or_internal_id: impl Into<String>) -> Self {
        Self {
            identifier_or_internal_id: identifier_or_internal_id.into(),
            environment_id: context.environment_id().to_string(),
            organization_id: context.organization_id().to_string(),
            user_id: context.user_id().to_string(),
        }
    }
}

/// Sort direction for workflow search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

/// Sortable workflow fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowOrderField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
}

/// Paginated, scoped workflow search
#[derive(Debug, Clone)]
pub struct WorkflowSearchQuery {
    pub environment_id: String,
    pub organization_id: String,
    pub offset: usize,
    pub limit: usize,
    pub order_direction: OrderDirection,
    pub order_by_field: WorkflowOrderField,
    /// Free-text filter matched against name and trigger identifier
    pub query: Option<String>,
}

impl WorkflowSearchQuery {
    pub fn new(context: &RequestContext) -> Self {
        Self {
            environment_id: context.environment_id().to_string(),
            organization_id: context.organization_id().to_string(),
            offset: 0,
            limit: 50,
            order_direction: OrderDirection::default(),
            order_by_field: WorkflowOrderField::default(),
            query: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_order(
        mut self,
        direction: OrderDirection,
        field: WorkflowOrderField,
    ) -> Self {
        self.order_direction = direction;
        self.order_by_field = field;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// One page of search results
#[derive(Debug, Clone)]
pub struct WorkflowPage {
    pub workflows: Vec<Workflow>,
    pub total_count: usize,
}

/// Repository trait for workflow persistence
#[async_trait]
pub trait WorkflowRepository: Send + Sync + std::fmt::Debug {
    /// Resolve a workflow by external identifier or internal id within
    /// the caller's environment/organization scope
    async fn find_by_identifier_or_id(
        &self,
        lookup: &WorkflowLookup,
    ) -> Result<Option<Workflow>, DomainError>;

    /// Persist a new workflow
    async fn create(&self, workflow: Workflow) -> Result<Workflow, DomainError>;

    /// Replace an existing workflow
    async fn update(&self, workflow: Workflow) -> Result<Workflow, DomainError>;

    /// Delete a workflow by internal id within an environment
    async fn delete(&self, environment_id: &str, id: &str) -> Result<bool, DomainError>;

    /// Paginated search within an environment
    async fn search(&self, query: &WorkflowSearchQuery) -> Result<WorkflowPage, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Mock workflow repository for testing
    #[derive(Debug, Default)]
    pub struct MockWorkflowRepository {
        workflows: Mutex<Vec<Workflow>>,
        should_fail: Mutex<Option<String>>,
    }

    impl MockWorkflowRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_workflow(self, workflow: Workflow) -> Self {
            self.workflows.lock().unwrap().push(workflow);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.should_fail.lock().unwrap() = Some(error.into());
            self
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(ref msg) = *self.should_fail.lock().unwrap() {
                return Err(DomainError::storage(msg.clone()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl WorkflowRepository for MockWorkflowRepository {
        async fn find_by_identifier_or_id(
            &self,
            lookup: &WorkflowLookup,
        ) -> Result<Option<Workflow>, DomainError> {
            self.check_error()?;
            let workflows = self.workflows.lock().unwrap();
            Ok(workflows
                .iter()
                .find(|w| {
                    w.environment_id() == lookup.environment_id
                        && w.organization_id() == lookup.organization_id
                        && w.matches_identifier_or_id(&lookup.identifier_or_internal_id)
                })
                .cloned())
        }

        async fn create(&self, workflow: Workflow) -> Result<Workflow, DomainError> {
            self.check_error()?;
            self.workflows.lock().unwrap().push(workflow.clone());
            Ok(workflow)
        }

        async fn update(&self, workflow: Workflow) -> Result<Workflow, DomainError> {
            self.check_error()?;
            let mut workflows = self.workflows.lock().unwrap();

            match workflows.iter_mut().find(|w| w.id() == workflow.id()) {
                Some(slot) => {
                    *slot = workflow.clone();
                    Ok(workflow)
                }
                None => Err(DomainError::not_found(format!(
                    "Workflow '{}' not found",
                    workflow.id()
                ))),
            }
        }

        async fn delete(&self, environment_id: &str, id: &str) -> Result<bool, DomainError> {
            self.check_error()?;
            let mut workflows = self.workflows.lock().unwrap();
            let before = workflows.len();
            workflows.retain(|w| !(w.environment_id() == environment_id && w.id() == id));
            Ok(workflows.len() < before)
        }

        async fn search(&self, query: &WorkflowSearchQuery) -> Result<WorkflowPage, DomainError> {
            self.check_error()?;
            let workflows = self.workflows.lock().unwrap();
            let matches: Vec<Workflow> = workflows
                .iter()
                .filter(|w| {
                    w.environment_id() == query.environment_id
                        && w.organization_id() == query.organization_id
                })
                .cloned()
                .collect();

            let total_count = matches.len();
            Ok(WorkflowPage {
                workflows: matches
                    .into_iter()
                    .skip(query.offset)
                    .take(query.limit)
                    .collect(),
                total_count,
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn test_context() -> RequestContext {
            RequestContext::new("env-1", "org-1", "user-1")
        }

        fn test_workflow(id: &str, identifier: &str) -> Workflow {
            use crate::domain::workflow::entity::{TriggerIdentifier, WorkflowTrigger};

            Workflow::new(id, format!("Workflow {}", id), "env-1", "org-1").with_trigger(
                WorkflowTrigger::event(TriggerIdentifier::new(identifier).unwrap()),
            )
        }

        #[tokio::test]
        async fn test_mock_lookup_by_internal_id() {
            let repo = MockWorkflowRepository::new().with_workflow(test_workflow("w1", "trig-1"));

            let lookup = WorkflowLookup::new(&test_context(), "w1");
            let found = repo.find_by_identifier_or_id(&lookup).await.unwrap();
            assert!(found.is_some());
        }

        #[tokio::test]
        async fn test_mock_lookup_by_trigger_identifier() {
            let repo = MockWorkflowRepository::new().with_workflow(test_workflow("w1", "trig-1"));

            let lookup = WorkflowLookup::new(&test_context(), "trig-1");
            let found = repo.find_by_identifier_or_id(&lookup).await.unwrap();
            assert_eq!(found.unwrap().id(), "w1");
        }

        #[tokio::test]
        async fn test_mock_lookup_scoped_by_environment() {
            let repo = MockWorkflowRepository::new().with_workflow(test_workflow("w1", "trig-1"));

            let other = RequestContext::new("env-2", "org-1", "user-1");
            let lookup = WorkflowLookup::new(&other, "w1");
            let found = repo.find_by_identifier_or_id(&lookup).await.unwrap();
            assert!(found.is_none());
        }

        #[tokio::test]
        async fn test_mock_with_error() {
            let repo = MockWorkflowRepository::new().with_error("boom");

            let lookup = WorkflowLookup::new(&test_context(), "w1");
            let result = repo.find_by_identifier_or_id(&lookup).await;
            assert!(result.is_err());
        }
    }
}
