use dermascan::ModelRuntime;

use crate::routes::{json_response, HttpResponse};
use crate::schema::HealthResponse;
use crate::state::SharedState;

/// `GET /health`
///
/// Always answers 200; reports `degraded` while the model is unloaded.
pub fn handle(state: &SharedState) -> HttpResponse {
    json_response(200, &body(state.pipeline.runtime()))
}

pub fn body(runtime: &ModelRuntime) -> HealthResponse<'_> {
    let loaded = runtime.is_loaded();
    HealthResponse {
        success: true,
        status: if loaded { "ok" } else { "degraded" },
        model_loaded: loaded,
        message: runtime.load_error(),
    }
}
