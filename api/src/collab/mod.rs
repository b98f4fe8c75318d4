//! Collaborator trait boundary: the job queue, task store, and webhook
//! notifier the engine itself never depends on. Each trait has one
//! concrete, single-process implementation appropriate for this demo
//! deployment; a production deployment swaps the implementation without
//! touching routes or `aegis-core`.

mod queue;
mod store;
mod webhook;

pub use queue::{AssessmentJob, InProcessJobQueue, JobQueue};
pub use store::{InMemoryTaskStore, TaskRecord, TaskStatus, TaskStore};
pub use webhook::{NullWebhookNotifier, ReqwestWebhookNotifier, WebhookNotifier};

use uuid::Uuid;

/// UUIDv4 rendered with dashes.
pub type TaskId = Uuid;

pub fn new_task_id() -> TaskId {
    Uuid::new_v4()
}
