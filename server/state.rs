use std::sync::Arc;

use dermascan::{InferencePipeline, Settings};

/// Read-only after startup; shared by every worker without locking.
pub struct AppState {
    pub pipeline: InferencePipeline,
    pub settings: Settings,
}

pub type SharedState = Arc<AppState>;
