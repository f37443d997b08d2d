//! dermascan server
//!
//! Serves skin-lesion classification over HTTP with a synchronous tiny_http
//! listener and a fixed pool of worker threads.
//!
//! Run with:
//!   MODEL_PATH=model/skin_model.json cargo run --release
//!
//! Routes:
//!   GET  /health                  — model status (`ok` / `degraded`)
//!   POST /api/v1/predict/upload   — multipart field `file`
//!   POST /api/v1/predict/camera   — JSON `{"image_base64": "..."}`

mod handlers;
mod routes;
mod schema;
mod state;
mod util;

use std::io;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use tiny_http::Server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dermascan::{InferencePipeline, ModelRuntime, Settings};
use state::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Worker loop. Accept errors are per-connection, so the worker keeps going;
/// it exits only when the listener is unblocked for shutdown.
fn serve(server: &Server, state: &state::SharedState) {
    loop {
        match server.recv() {
            Ok(request) => routes::dispatch(request, state),
            Err(e) if listener_closed(&e) => break,
            Err(e) => error!(error = %e, "failed to accept request"),
        }
    }
}

/// tiny_http reports an unblocked (shutting down) listener as this error.
fn listener_closed(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Other && err.to_string() == "thread unblocked"
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = Settings::parse();
    init_tracing();

    // A failed load is recorded and the server starts degraded.
    let mut runtime = ModelRuntime::new(settings.class_names.clone());
    if let Err(err) = runtime.load(&settings.model_path) {
        error!(code = err.code(), message = err.message(), "starting without a model");
    }

    let pipeline = InferencePipeline::new(Arc::new(runtime), settings.image_size);
    let workers  = settings.worker_count();
    let server   = Arc::new(Server::http(settings.bind.as_str())?);

    info!(bind = %settings.bind, workers, image_size = settings.image_size, "dermascan listening");

    let state = Arc::new(AppState { pipeline, settings });

    let handles: Vec<_> = (0..workers)
        .map(|id| {
            let server = Arc::clone(&server);
            let state  = Arc::clone(&state);
            thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn(move || serve(&server, &state))
        })
        .collect::<Result<_, _>>()?;

    for handle in handles {
        let _ = handle.join();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unblock_ends_a_worker() {
        assert!(listener_closed(&io::Error::new(io::ErrorKind::Other, "thread unblocked")));
        assert!(!listener_closed(&io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")));
        assert!(!listener_closed(&io::Error::new(io::ErrorKind::Other, "tls handshake failed")));
    }
}
