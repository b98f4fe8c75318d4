use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod collab;
mod config;
mod error;
mod routes;
mod state;

use aegis_core::{Engine, EngineConfig};
use collab::{InMemoryTaskStore, InProcessJobQueue, NullWebhookNotifier, ReqwestWebhookNotifier, WebhookNotifier};
use config::DeploymentConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aegis_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let deployment = DeploymentConfig::from_env();

    let engine = Arc::new(Engine::new(EngineConfig::default()));

    let store = InMemoryTaskStore::new();
    let webhook: Arc<dyn WebhookNotifier> = match deployment.webhook_url.clone() {
        Some(url) => {
            tracing::info!(%url, "assessment webhook configured");
            Arc::new(ReqwestWebhookNotifier::new(url))
        }
        None => Arc::new(NullWebhookNotifier),
    };
    let queue = Arc::new(InProcessJobQueue::spawn(
        engine.clone(),
        store.clone(),
        webhook,
    ));

    let app_state = AppState {
        engine,
        queue,
        store,
    };

    let app = app::build(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], deployment.port));
    tracing::info!("aegis-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
