use super::store::TaskRecord;

/// Delivers a completed assessment to an external listener. A failure here
/// is logged by the caller and never propagated into the task record or
/// the engine's state — webhook delivery is best-effort and non-fatal.
#[async_trait::async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn notify(&self, record: &TaskRecord) -> Result<(), String>;
}

/// Used when `ASSESSMENT_WEBHOOK_URL` is not configured.
pub struct NullWebhookNotifier;

#[async_trait::async_trait]
impl WebhookNotifier for NullWebhookNotifier {
    async fn notify(&self, _record: &TaskRecord) -> Result<(), String> {
        Ok(())
    }
}

pub struct ReqwestWebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl ReqwestWebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl WebhookNotifier for ReqwestWebhookNotifier {
    async fn notify(&self, record: &TaskRecord) -> Result<(), String> {
        self.client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|error| error.to_string())?
            .error_for_status()
            .map_err(|error| error.to_string())?;
        Ok(())
    }
}
