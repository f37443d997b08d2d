use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, ServiceError};

/// Decodes a camera payload: raw base64, or a data URI whose payload follows
/// the first comma. Decoding is strict (standard alphabet, canonical padding).
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let encoded = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };
    STANDARD.decode(encoded).map_err(|e| {
        tracing::debug!(error = %e, "base64 payload rejected");
        ServiceError::Decoding("Unable to decode base64 image payload.".into())
    })
}
