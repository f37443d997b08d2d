//! JSON bodies exchanged with clients.

use serde::{Deserialize, Serialize};

use dermascan::Diagnosis;

#[derive(Debug, Deserialize)]
pub struct CameraImageRequest {
    pub image_base64: String,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse<'a> {
    pub success: bool,
    pub disease: &'a str,
    pub confidence: f64,
    pub treatment_susceptibility: &'a str,
}

impl<'a> From<&'a Diagnosis> for PredictionResponse<'a> {
    fn from(d: &'a Diagnosis) -> Self {
        PredictionResponse {
            success: true,
            disease: &d.label,
            confidence: d.confidence,
            treatment_susceptibility: d.advisory_text(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse<'a> {
    pub success: bool,
    pub status: &'a str,
    pub model_loaded: bool,
    pub message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse<'a> {
    pub success: bool,
    pub error_code: &'a str,
    pub message: &'a str,
}

impl<'a> ErrorResponse<'a> {
    pub fn new(error_code: &'a str, message: &'a str) -> Self {
        ErrorResponse { success: false, error_code, message }
    }
}

impl ErrorResponse<'static> {
    /// Body for malformed requests (bad JSON, missing upload field).
    pub fn validation() -> Self {
        ErrorResponse::new(
            "REQUEST_VALIDATION_ERROR",
            "Invalid request payload. Please verify submitted fields.",
        )
    }
}
