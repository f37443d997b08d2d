//! Per-request orchestration: validate, decode, normalize, predict, advise.

use std::sync::Arc;

use serde::Serialize;

use crate::advisor::{advise, AdvisoryTier};
use crate::error::{Result, ServiceError};
use crate::preprocess::{decode_base64, normalize, validate_filename};
use crate::runtime::ModelRuntime;

/// Raw image data as it arrives from a client.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Multipart upload with the client's claimed filename.
    Upload { bytes: Vec<u8>, filename: String },
    /// Raw base64 or a `data:` URI.
    Camera { payload: String },
}

/// Outcome of one inference request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub label: String,
    /// Rounded to 4 decimal places.
    pub confidence: f64,
    pub tier: AdvisoryTier,
}

impl Diagnosis {
    pub fn advisory_text(&self) -> &'static str {
        self.tier.text()
    }
}

pub struct InferencePipeline {
    runtime: Arc<ModelRuntime>,
    image_size: u32,
}

impl InferencePipeline {
    pub fn new(runtime: Arc<ModelRuntime>, image_size: u32) -> InferencePipeline {
        let pipeline = InferencePipeline { runtime, image_size };
        if !pipeline.input_size_matches() {
            tracing::warn!(
                image_size,
                model_edge = ?pipeline.runtime.input_edge(),
                "configured image size differs from the model's declared input"
            );
        }
        pipeline
    }

    pub fn runtime(&self) -> &ModelRuntime {
        &self.runtime
    }

    /// False when the artifact declares an input edge other than the
    /// configured image size. Unknown edges are assumed to match.
    pub fn input_size_matches(&self) -> bool {
        self.runtime.input_edge().map_or(true, |edge| edge == self.image_size)
    }

    /// Runs one request end to end. Errors keep the kind of the step that
    /// raised them.
    pub fn infer(&self, source: ImageSource) -> Result<Diagnosis> {
        let bytes = match source {
            ImageSource::Upload { bytes, filename } => {
                validate_filename(&filename)?;
                if bytes.is_empty() {
                    return Err(ServiceError::Decoding("Uploaded file is empty.".into()));
                }
                bytes
            }
            ImageSource::Camera { payload } => decode_base64(&payload)?,
        };

        let tensor = normalize(&bytes, self.image_size)?;
        self.ensure_available()?;
        let prediction = self.runtime.predict(&tensor)?;
        let tier = advise(prediction.confidence);

        Ok(Diagnosis {
            label: prediction.label,
            confidence: round4(prediction.confidence),
            tier,
        })
    }

    fn ensure_available(&self) -> Result<()> {
        if self.runtime.is_loaded() {
            return Ok(());
        }
        let detail = self
            .runtime
            .load_error()
            .unwrap_or("AI model is unavailable. Please check MODEL_PATH and startup logs.");
        Err(ServiceError::ModelLoad(detail.to_owned()))
    }
}

/// Ties round to even, so `0.65625` becomes `0.6562`.
fn round4(value: f32) -> f64 {
    (f64::from(value) * 10_000.0).round_ties_even() / 10_000.0
}
