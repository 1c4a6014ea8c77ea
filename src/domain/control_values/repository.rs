//! Control values repository trait

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::entity::{ControlValuesLevel, ControlValuesRecord};
use crate::domain::DomainError;

/// Key tuple identifying a single control values record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlValuesQuery {
    pub environment_id: String,
    pub organization_id: String,
    pub workflow_id: String,
    pub step_id: String,
    pub level: ControlValuesLevel,
}

impl ControlValuesQuery {
    pub fn step_controls(
        environment_id: impl Into<String>,
        organization_id: impl Into<String>,
        workflow_id: impl Into<String>,
        step_id: impl Into<String>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            organization_id: organization_id.into(),
            workflow_id: workflow_id.into(),
            step_id: step_id.into(),
            level: ControlValuesLevel::StepControls,
        }
    }
}

/// Repository trait for control values persistence.
///
/// Absence of a record is valid and never an error; only storage
/// failures are reported.
#[async_trait]
pub trait ControlValuesRepository: Send + Sync + std::fmt::Debug {
    /// Fetch the single record for a key tuple, if any
    async fn find_one(
        &self,
        query: &ControlValuesQuery,
    ) -> Result<Option<ControlValuesRecord>, DomainError>;

    /// Insert or replace the record for a key tuple
    async fn upsert(
        &self,
        query: &ControlValuesQuery,
        controls: Map<String, Value>,
    ) -> Result<ControlValuesRecord, DomainError>;

    /// Delete the record for a key tuple; returns whether one existed
    async fn delete(&self, query: &ControlValuesQuery) -> Result<bool, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Mock control values repository for testing
    #[derive(Debug, Default)]
    pub struct MockControlValuesRepository {
        records: Mutex<Vec<ControlValuesRecord>>,
        should_fail: Mutex<Option<String>>,
    }

    impl MockControlValuesRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_record(self, record: ControlValuesRecord) -> Self {
            self.records.lock().unwrap().push(record);
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

        fn matches(record: &ControlValuesRecord, query: &ControlValuesQuery) -> bool {
            record.environment_id() == query.environment_id
                && record.organization_id() == query.organization_id
                && record.workflow_id() == query.workflow_id
                && record.step_id() == query.step_id
                && record.level() == query.level
        }
    }

    #[async_trait]
    impl ControlValuesRepository for MockControlValuesRepository {
        async fn find_one(
            &self,
            query: &ControlValuesQuery,
        ) -> Result<Option<ControlValuesRecord>, DomainError> {
            self.check_error()?;
            let records = self.records.lock().unwrap();
            Ok(records.iter().find(|r| Self::matches(r, query)).cloned())
        }

        async fn upsert(
            &self,
            query: &ControlValuesQuery,
            controls: Map<String, Value>,
        ) -> Result<ControlValuesRecord, DomainError> {
            self.check_error()?;
            let record = ControlValuesRecord::new(
                query.environment_id.clone(),
                query.organization_id.clone(),
                query.workflow_id.clone(),
                query.step_id.clone(),
                query.level,
                controls,
            );

            let mut records = self.records.lock().unwrap();
            records.retain(|r| !Self::matches(r, query));
            records.push(record.clone());
            Ok(record)
        }

        async fn delete(&self, query: &ControlValuesQuery) -> Result<bool, DomainError> {
            self.check_error()?;
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| !Self::matches(r, query));
            Ok(records.len() < before)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        fn query() -> ControlValuesQuery {
            ControlValuesQuery::step_controls("env-1", "org-1", "w1", "s1")
        }

        #[tokio::test]
        async fn test_find_one_absent_is_none() {
            let repo = MockControlValuesRepository::new();
            let found = repo.find_one(&query()).await.unwrap();
            assert!(found.is_none());
        }

        #[tokio::test]
        async fn test_upsert_then_find() {
            let repo = MockControlValuesRepository::new();

            let mut controls = Map::new();
            controls.insert("subject".to_string(), json!("Hi"));
            repo.upsert(&query(), controls).await.unwrap();

            let found = repo.find_one(&query()).await.unwrap().unwrap();
            assert_eq!(found.controls().get("subject"), Some(&json!("Hi")));
        }

        #[tokio::test]
        async fn test_upsert_replaces_existing() {
            let repo = MockControlValuesRepository::new();

            let mut first = Map::new();
            first.insert("subject".to_string(), json!("Hi"));
            repo.upsert(&query(), first).await.unwrap();

            let mut second = Map::new();
            second.insert("subject".to_string(), json!("Hello"));
            repo.upsert(&query(), second).await.unwrap();

            let found = repo.find_one(&query()).await.unwrap().unwrap();
            assert_eq!(found.controls().get("subject"), Some(&json!("Hello")));
        }

        #[tokio::test]
        async fn test_delete() {
            let repo = MockControlValuesRepository::new();
            repo.upsert(&query(), Map::new()).await.unwrap();

            assert!(repo.delete(&query()).await.unwrap());
            assert!(!repo.delete(&query()).await.unwrap());
        }
    }
}
