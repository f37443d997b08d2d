//! Error taxonomy surfaced by the inference pipeline.
//!
//! Every fallible core operation returns exactly one [`ServiceError`] kind.
//! Underlying causes are logged where they are converted; only the
//! human-readable message travels to the caller.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Filename or extension rejected before any decoding.
    #[error("{0}")]
    InvalidFormat(String),

    /// Body empty, base64 malformed, or bytes not an image.
    #[error("{0}")]
    Decoding(String),

    /// Model artifact missing or unusable.
    #[error("{0}")]
    ModelLoad(String),

    /// Runtime not loaded at predict time, or the prediction call failed.
    #[error("{0}")]
    Inference(String),
}

impl ServiceError {
    /// Stable machine-readable code carried in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidFormat(_) => "INVALID_IMAGE_FORMAT",
            ServiceError::Decoding(_) => "IMAGE_DECODING_ERROR",
            ServiceError::ModelLoad(_) => "MODEL_LOADING_FAILED",
            ServiceError::Inference(_) => "INFERENCE_FAILED",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::InvalidFormat(m)
            | ServiceError::Decoding(m)
            | ServiceError::ModelLoad(m)
            | ServiceError::Inference(m) => m,
        }
    }
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_kind() {
        let errors = [
            ServiceError::InvalidFormat("a".into()),
            ServiceError::Decoding("b".into()),
            ServiceError::ModelLoad("c".into()),
            ServiceError::Inference("d".into()),
        ];
        let mut codes: Vec<_> = errors.iter().map(ServiceError::code).collect();
        codes.dedup();
        assert_eq!(codes.len(), 4);
    }

    #[test]
    fn display_is_the_message() {
        let err = ServiceError::Decoding("Uploaded file is empty.".into());
        assert_eq!(err.to_string(), "Uploaded file is empty.");
        assert_eq!(err.message(), "Uploaded file is empty.");
    }
}
