use std::collections::HashMap;
use std::sync::Arc;

use aegis_core::{ActivityEvent, IdentityContext, PrivilegeChange, RiskAssessment};
use serde::Serialize;
use tokio::sync::RwLock;

use super::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// Persisted record of one async assessment, written once by the worker
/// and read by `GET /tasks/{task_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub identity: IdentityContext,
    pub event: ActivityEvent,
    pub privilege_change: Option<PrivilegeChange>,
    pub assessment: Option<RiskAssessment>,
    pub status: TaskStatus,
}

#[async_trait::async_trait]
pub trait TaskStore: Send + Sync {
    async fn put(&self, record: TaskRecord);
    async fn get(&self, task_id: &TaskId) -> Option<TaskRecord>;
}

/// In-memory task store. Not durable across restarts, which is acceptable
/// for a demo deployment; a real one swaps this for a `sqlx`-backed store.
#[derive(Default)]
pub struct InMemoryTaskStore {
    records: RwLock<HashMap<TaskId, TaskRecord>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait::async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn put(&self, record: TaskRecord) {
        self.records.write().await.insert(record.task_id, record);
    }

    async fn get(&self, task_id: &TaskId) -> Option<TaskRecord> {
        self.records.read().await.get(task_id).cloned()
    }
}
