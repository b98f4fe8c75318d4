use std::sync::Arc;

use aegis_core::Engine;

use crate::collab::{JobQueue, TaskStore};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub queue: Arc<dyn JobQueue>,
    pub store: Arc<dyn TaskStore>,
}
