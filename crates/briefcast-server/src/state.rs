use std::sync::Arc;

use briefcast_config::VoicesConfig;
use synthesis::{Orchestrator, TaskStore};

/// Shared state behind every route
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<TaskStore>,
    pub voices: Arc<VoicesConfig>,
}
