use std::io::Read;

use tiny_http::Request;
use tracing::info;

use dermascan::{Diagnosis, ImageSource, ServiceError};

use crate::routes::{
    error_response, json_response, payload_too_large, request_header, validation_error, HttpResponse,
};
use crate::schema::{CameraImageRequest, PredictionResponse};
use crate::state::SharedState;
use crate::util::multipart::{extract_boundary, extract_file_part};

/// Multipart field carrying the uploaded image.
const UPLOAD_FIELD: &str = "file";

/// Largest multipart body accepted.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Largest camera body accepted; base64 inflates the image by about 4/3.
pub const MAX_CAMERA_BYTES: u64 = 14 * 1024 * 1024;

// ---------------------------------------------------------------------------
// POST /api/v1/predict/upload
// ---------------------------------------------------------------------------

pub fn handle_upload(request: &mut Request, state: &SharedState) -> HttpResponse {
    let content_type = request_header(request, "Content-Type").unwrap_or_default();
    if !content_type.starts_with("multipart/form-data") {
        return validation_error();
    }
    let Some(boundary) = extract_boundary(&content_type) else {
        return validation_error();
    };

    let body = match read_body(request.as_reader(), MAX_UPLOAD_BYTES) {
        Ok(b)  => b,
        Err(resp) => return resp,
    };

    let Some(part) = extract_file_part(&body, &boundary, UPLOAD_FIELD) else {
        return validation_error();
    };

    respond(state, ImageSource::Upload { bytes: part.bytes, filename: part.filename })
}

// ---------------------------------------------------------------------------
// POST /api/v1/predict/camera
// ---------------------------------------------------------------------------

pub fn handle_camera(request: &mut Request, state: &SharedState) -> HttpResponse {
    let body = match read_body(request.as_reader(), MAX_CAMERA_BYTES) {
        Ok(b)  => b,
        Err(resp) => return resp,
    };
    match camera_source(&body) {
        Some(source) => respond(state, source),
        None => validation_error(),
    }
}

/// Parses a camera JSON body; `None` when it is not `{"image_base64": "..."}`.
pub fn camera_source(body: &[u8]) -> Option<ImageSource> {
    let payload: CameraImageRequest = serde_json::from_slice(body).ok()?;
    Some(ImageSource::Camera { payload: payload.image_base64 })
}

/// Reads at most `limit` bytes; a longer body is answered with 413.
pub fn read_body(reader: impl Read, limit: u64) -> Result<Vec<u8>, HttpResponse> {
    let mut body = Vec::new();
    if reader.take(limit + 1).read_to_end(&mut body).is_err() {
        return Err(validation_error());
    }
    if body.len() as u64 > limit {
        return Err(payload_too_large(limit));
    }
    Ok(body)
}

fn respond(state: &SharedState, source: ImageSource) -> HttpResponse {
    let result: Result<Diagnosis, ServiceError> = state.pipeline.infer(source);
    match result {
        Ok(diagnosis) => {
            info!(label = %diagnosis.label, confidence = diagnosis.confidence, "prediction served");
            json_response(200, &PredictionResponse::from(&diagnosis))
        }
        Err(err) => error_response(&err),
    }
}
