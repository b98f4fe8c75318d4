use std::sync::Arc;

use aegis_core::{ActivityEvent, Engine, IdentityContext, PrivilegeChange};
use tokio::sync::mpsc;

use super::store::{TaskRecord, TaskStatus, TaskStore};
use super::webhook::WebhookNotifier;
use super::TaskId;

/// One unit of work for the async assessment worker.
#[derive(Debug, Clone)]
pub struct AssessmentJob {
    pub task_id: TaskId,
    pub identity: IdentityContext,
    pub event: ActivityEvent,
    pub privilege_change: Option<PrivilegeChange>,
}

/// Enqueues assessment jobs. The only synchronous half of the async task
/// contract — handing a job to the queue never blocks on detector work.
pub trait JobQueue: Send + Sync {
    fn enqueue(&self, job: AssessmentJob);
}

/// In-process queue backed by an unbounded mpsc channel and a background
/// worker task, standing in for a message-broker-backed queue at a scale
/// appropriate to a single-process demo.
pub struct InProcessJobQueue {
    sender: mpsc::UnboundedSender<AssessmentJob>,
}

impl InProcessJobQueue {
    /// Spawns the worker loop on the current tokio runtime and returns a
    /// handle to the queue. The worker runs until every sender is dropped.
    pub fn spawn(
        engine: Arc<Engine>,
        store: Arc<dyn TaskStore>,
        webhook: Arc<dyn WebhookNotifier>,
    ) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<AssessmentJob>();

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let assessment =
                    engine.assess_event(&job.identity, &job.event, job.privilege_change.as_ref());

                let record = TaskRecord {
                    task_id: job.task_id,
                    identity: job.identity,
                    event: job.event,
                    privilege_change: job.privilege_change,
                    assessment: Some(assessment.clone()),
                    status: TaskStatus::Completed,
                };
                store.put(record.clone()).await;

                if let Err(error) = webhook.notify(&record).await {
                    tracing::warn!(task_id = %job.task_id, %error, "webhook delivery failed");
                }
            }
        });

        Self { sender }
    }
}

impl JobQueue for InProcessJobQueue {
    fn enqueue(&self, job: AssessmentJob) {
        // The channel is unbounded and the worker never exits while `self`
        // is alive, so this can only fail if the worker task panicked.
        if self.sender.send(job).is_err() {
            tracing::error!("assessment worker task is no longer running");
        }
    }
}
