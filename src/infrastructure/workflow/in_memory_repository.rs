//! In-memory workflow repository implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    DomainError, OrderDirection, Workflow, WorkflowLookup, WorkflowOrderField, WorkflowPage,
    WorkflowRepository, WorkflowSearchQuery,
};

/// In-memory implementation of WorkflowRepository, keyed by internal id
#[derive(Debug)]
pub struct InMemoryWorkflowRepository {
    workflows: Arc<RwLock<HashMap<String, Workflow>>>,
}

impl InMemoryWorkflowRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            workflows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a repository pre-populated with workflows
    pub fn with_workflows(workflows: Vec<Workflow>) -> Self {
        let map: HashMap<String, Workflow> = workflows
            .into_iter()
            .map(|w| (w.id().to_string(), w))
            .collect();

        Self {
            workflows: Arc::new(RwLock::new(map)),
        }
    }

    fn in_scope(workflow: &Workflow, environment_id: &str, organization_id: &str) -> bool {
        workflow.environment_id() == environment_id
            && workflow.organization_id() == organization_id
    }

    fn matches_text(workflow: &Workflow, text: &str) -> bool {
        let needle = text.to_lowercase();
        workflow.name().to_lowercase().contains(&needle)
            || workflow
                .trigger_identifier()
                .is_some_and(|identifier| identifier.to_lowercase().contains(&needle))
    }
}

impl Default for InMemoryWorkflowRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn find_by_identifier_or_id(
        &self,
        lookup: &WorkflowLookup,
    ) -> Result<Option<Workflow>, DomainError> {
        let workflows = self.workflows.read().await;
        Ok(workflows
            .values()
            .find(|w| {
                Self::in_scope(w, &lookup.environment_id, &lookup.organization_id)
                    && w.matches_identifier_or_id(&lookup.identifier_or_internal_id)
            })
            .cloned())
    }

    async fn create(&self, workflow: Workflow) -> Result<Workflow, DomainError> {
        let mut workflows = self.workflows.write().await;

        if workflows.contains_key(workflow.id()) {
            return Err(DomainError::conflict(format!(
                "Workflow '{}' already exists",
                workflow.id()
            )));
        }

        let duplicate_identifier = workflow.trigger_identifier().is_some_and(|identifier| {
            workflows.values().any(|existing| {
                Self::in_scope(
                    existing,
                    workflow.environment_id(),
                    workflow.organization_id(),
                ) && existing.trigger_identifier() == Some(identifier)
            })
        });

        if duplicate_identifier {
            return Err(DomainError::conflict(format!(
                "Workflow identifier '{}' already exists in this environment",
                workflow.trigger_identifier().unwrap_or_default()
            )));
        }

        workflows.insert(workflow.id().to_string(), workflow.clone());
        Ok(workflow)
    }

    async fn update(&self, workflow: Workflow) -> Result<Workflow, DomainError> {
        let mut workflows = self.workflows.write().await;

        if !workflows.contains_key(workflow.id()) {
            return Err(DomainError::not_found(format!(
                "Workflow '{}' not found",
                workflow.id()
            )));
        }

        workflows.insert(workflow.id().to_string(), workflow.clone());
        Ok(workflow)
    }

    async fn delete(&self, environment_id: &str, id: &str) -> Result<bool, DomainError> {
        let mut workflows = self.workflows.write().await;

        let matches_scope = workflows
            .get(id)
            .is_some_and(|w| w.environment_id() == environment_id);

        if !matches_scope {
            return Ok(false);
        }

        Ok(workflows.remove(id).is_some())
    }

    async fn search(&self, query: &WorkflowSearchQuery) -> Result<WorkflowPage, DomainError> {
        let workflows = self.workflows.read().await;

        let mut matches: Vec<Workflow> = workflows
            .values()
            .filter(|w| Self::in_scope(w, &query.environment_id, &query.organization_id))
            .filter(|w| {
                query
                    .query
                    .as_deref()
                    .map(|text| Self::matches_text(w, text))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match query.order_by_field {
                WorkflowOrderField::CreatedAt => a.created_at().cmp(&b.created_at()),
                WorkflowOrderField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
                WorkflowOrderField::Name => a.name().cmp(b.name()),
            };
            match query.order_direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            }
        });

        let total_count = matches.len();
        let workflows = matches
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(WorkflowPage {
            workflows,
            total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RequestContext, TriggerIdentifier, WorkflowTrigger};

    fn test_context() -> RequestContext {
        RequestContext::new("env-1", "org-1", "user-1")
    }

    fn test_workflow(id: &str, identifier: &str, name: &str) -> Workflow {
        Workflow::new(id, name, "env-1", "org-1").with_trigger(WorkflowTrigger::event(
            TriggerIdentifier::new(identifier).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = InMemoryWorkflowRepository::new();
        repo.create(test_workflow("w1", "onboarding", "Onboarding"))
            .await
            .unwrap();

        let by_id = repo
            .find_by_identifier_or_id(&WorkflowLookup::new(&test_context(), "w1"))
            .await
            .unwrap();
        assert!(by_id.is_some());

        let by_identifier = repo
            .find_by_identifier_or_id(&WorkflowLookup::new(&test_context(), "onboarding"))
            .await
            .unwrap();
        assert_eq!(by_identifier.unwrap().id(), "w1");
    }

    #[tokio::test]
    async fn test_create_duplicate_identifier_in_environment() {
        let repo = InMemoryWorkflowRepository::new();
        repo.create(test_workflow("w1", "onboarding", "Onboarding"))
            .await
            .unwrap();

        let result = repo
            .create(test_workflow("w2", "onboarding", "Other"))
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_same_identifier_in_other_environment_is_allowed() {
        let repo = InMemoryWorkflowRepository::new();
        repo.create(test_workflow("w1", "onboarding", "Onboarding"))
            .await
            .unwrap();

        let other_env = Workflow::new("w2", "Onboarding", "env-2", "org-1").with_trigger(
            WorkflowTrigger::event(TriggerIdentifier::new("onboarding").unwrap()),
        );
        assert!(repo.create(other_env).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let repo = InMemoryWorkflowRepository::new();
        let result = repo
            .update(test_workflow("ghost", "ghost", "Ghost"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_scoped_by_environment() {
        let repo = InMemoryWorkflowRepository::new();
        repo.create(test_workflow("w1", "onboarding", "Onboarding"))
            .await
            .unwrap();

        assert!(!repo.delete("env-2", "w1").await.unwrap());
        assert!(repo.delete("env-1", "w1").await.unwrap());
        assert!(!repo.delete("env-1", "w1").await.unwrap());
    }

    #[tokio::test]
    async fn test_search_filters_by_text() {
        let repo = InMemoryWorkflowRepository::new();
        repo.create(test_workflow("w1", "user-onboarding", "Onboarding"))
            .await
            .unwrap();
        repo.create(test_workflow("w2", "weekly-digest", "Weekly Digest"))
            .await
            .unwrap();

        let query = WorkflowSearchQuery::new(&test_context()).with_query("digest");
        let page = repo.search(&query).await.unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.workflows[0].id(), "w2");
    }

    #[tokio::test]
    async fn test_search_matches_trigger_identifier() {
        let repo = InMemoryWorkflowRepository::new();
        repo.create(test_workflow("w1", "user-onboarding", "Welcome"))
            .await
            .unwrap();

        let query = WorkflowSearchQuery::new(&test_context()).with_query("onboarding");
        let page = repo.search(&query).await.unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn test_search_pagination() {
        let repo = InMemoryWorkflowRepository::new();
        for i in 0..5 {
            repo.create(test_workflow(
                &format!("w{}", i),
                &format!("flow-{}", i),
                &format!("Flow {}", i),
            ))
            .await
            .unwrap();
        }

        let query = WorkflowSearchQuery::new(&test_context())
            .with_offset(2)
            .with_limit(2);
        let page = repo.search(&query).await.unwrap();

        assert_eq!(page.total_count, 5);
        assert_eq!(page.workflows.len(), 2);
    }

    #[tokio::test]
    async fn test_search_order_by_name_ascending() {
        let repo = InMemoryWorkflowRepository::new();
        repo.create(test_workflow("w1", "b-flow", "Beta"))
            .await
            .unwrap();
        repo.create(test_workflow("w2", "a-flow", "Alpha"))
            .await
            .unwrap();

        let query = WorkflowSearchQuery::new(&test_context())
            .with_order(OrderDirection::Asc, WorkflowOrderField::Name);
        let page = repo.search(&query).await.unwrap();

        assert_eq!(page.workflows[0].name(), "Alpha");
        assert_eq!(page.workflows[1].name(), "Beta");
    }
}
