use std::io::Cursor;

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use dermascan::ServiceError;

use crate::handlers;
use crate::schema::ErrorResponse;
use crate::state::SharedState;

pub type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

pub fn json_response<T: Serialize>(status: u16, body: &T) -> HttpResponse {
    let bytes = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        header("Content-Type", "application/json").into_iter().collect(),
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

/// HTTP status for each core error kind.
pub fn status_for(err: &ServiceError) -> u16 {
    match err {
        ServiceError::InvalidFormat(_) | ServiceError::Decoding(_) => 400,
        ServiceError::ModelLoad(_) => 503,
        ServiceError::Inference(_) => 500,
    }
}

pub fn error_response(err: &ServiceError) -> HttpResponse {
    tracing::warn!(code = err.code(), message = err.message(), "handled request error");
    json_response(status_for(err), &ErrorResponse::new(err.code(), err.message()))
}

pub fn validation_error() -> HttpResponse {
    tracing::warn!("request validation failed");
    json_response(422, &ErrorResponse::validation())
}

pub fn payload_too_large(limit: u64) -> HttpResponse {
    tracing::warn!(limit, "request body over limit");
    let message = format!("Request body exceeds {} bytes.", limit);
    json_response(413, &ErrorResponse::new("PAYLOAD_TOO_LARGE", &message))
}

pub fn not_found() -> HttpResponse {
    json_response(404, &ErrorResponse::new("NOT_FOUND", "Route not found."))
}

pub fn no_content() -> HttpResponse {
    Response::new(StatusCode(204), vec![], Cursor::new(Vec::new()), Some(0), None)
}

pub fn request_header(request: &Request, name: &'static str) -> Option<String> {
    request.headers().iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str().to_owned())
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

fn apply_cors(response: &mut HttpResponse, origin: &str, preflight: Option<&str>) {
    let mut headers = vec![
        header("Access-Control-Allow-Origin", origin),
        header("Access-Control-Allow-Credentials", "true"),
        header("Vary", "Origin"),
    ];
    if let Some(requested) = preflight {
        headers.push(header("Access-Control-Allow-Methods", "GET, POST, OPTIONS"));
        headers.push(header("Access-Control-Allow-Headers", requested));
        headers.push(header("Access-Control-Max-Age", "600"));
    }
    for h in headers.into_iter().flatten() {
        response.add_header(h);
    }
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes one request and writes the response. Runs on a worker thread; the
/// prediction call blocks only that worker.
pub fn dispatch(mut request: Request, state: &SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("").to_owned();
    let origin = request_header(&request, "Origin")
        .filter(|o| state.settings.allows_origin(o));

    let mut preflight = None;
    let mut response = match (&method, path.as_str()) {
        (Method::Options, _) => {
            preflight = Some(
                request_header(&request, "Access-Control-Request-Headers")
                    .unwrap_or_else(|| "Content-Type".to_owned()),
            );
            no_content()
        }

        (Method::Get,  "/health")                => handlers::health::handle(state),
        (Method::Post, "/api/v1/predict/upload") => handlers::predict::handle_upload(&mut request, state),
        (Method::Post, "/api/v1/predict/camera") => handlers::predict::handle_camera(&mut request, state),

        _ => not_found(),
    };

    if let Some(origin) = origin.as_deref() {
        apply_cors(&mut response, origin, preflight.as_deref());
    }

    tracing::debug!(%method, %path, status = response.status_code().0, "request served");
    let _ = request.respond(response);
}
