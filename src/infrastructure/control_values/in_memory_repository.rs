//! In-memory control values repository implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::domain::{
    ControlValuesQuery, ControlValuesRecord, ControlValuesRepository, DomainError,
};

/// In-memory implementation of ControlValuesRepository
#[derive(Debug)]
pub struct InMemoryControlValuesRepository {
    records: Arc<RwLock<HashMap<String, ControlValuesRecord>>>,
}

impl InMemoryControlValuesRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn key(query: &ControlValuesQuery) -> String {
        format!(
            "{}:{}:{}:{}:{:?}",
            query.environment_id,
            query.organization_id,
            query.workflow_id,
            query.step_id,
            query.level
        )
    }
}

impl Default for InMemoryControlValuesRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ControlValuesRepository for InMemoryControlValuesRepository {
    async fn find_one(
        &self,
        query: &ControlValuesQuery,
    ) -> Result<Option<ControlValuesRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&Self::key(query)).cloned())
    }

    async fn upsert(
        &self,
        query: &ControlValuesQuery,
        controls: Map<String, Value>,
    ) -> Result<ControlValuesRecord, DomainError> {
        let record = ControlValuesRecord::new(
            query.environment_id.clone(),
            query.organization_id.clone(),
            query.workflow_id.clone(),
            query.step_id.clone(),
            query.level,
            controls,
        );

        let mut records = self.records.write().await;
        records.insert(Self::key(query), record.clone());
        Ok(record)
    }

    async fn delete(&self, query: &ControlValuesQuery) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(&Self::key(query)).is_some())
    }
}
