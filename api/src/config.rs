/// Deployment-level settings read at startup. Collaborator-only:
/// nothing here changes detector scoring, which is governed entirely by
/// `aegis_core::EngineConfig`.
pub struct DeploymentConfig {
    /// Queue broker URL — unused by `InProcessJobQueue`, read to document
    /// the swap point for a real message-broker-backed deployment (see
    /// DESIGN.md).
    pub queue_broker_url: Option<String>,
    /// Result backend / persistent store URI — unused by
    /// `InMemoryTaskStore` for the same reason.
    pub task_store_uri: Option<String>,
    pub task_store_database: Option<String>,
    /// Outbound webhook URL (`ASSESSMENT_WEBHOOK_URL`). When unset, the
    /// worker uses `NullWebhookNotifier`.
    pub webhook_url: Option<String>,
    pub port: u16,
}

impl DeploymentConfig {
    pub fn from_env() -> Self {
        Self {
            queue_broker_url: non_empty_env("QUEUE_BROKER_URL"),
            task_store_uri: non_empty_env("TASK_STORE_URI"),
            task_store_database: non_empty_env("TASK_STORE_DATABASE"),
            webhook_url: non_empty_env("ASSESSMENT_WEBHOOK_URL"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
