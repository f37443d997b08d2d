//! Image decoding and rescaling.
//!
//! Bytes are decoded (PNG/JPEG/BMP/WebP/GIF), converted to RGB, resized to
//! `target_size × target_size` with the Catmull-Rom filter and rescaled to
//! `[0, 1]`.

use image::imageops::{self, FilterType};
use image::ImageError;

use crate::error::{Result, ServiceError};
use crate::preprocess::tensor::NormalizedTensor;

/// Resampling filter used for every resize; fixed so identical bytes always
/// produce identical tensors.
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Decodes `bytes` into a `[1, target_size, target_size, 3]` tensor.
///
/// `target_size` must be at least 1.
pub fn normalize(bytes: &[u8], target_size: u32) -> Result<NormalizedTensor> {
    if bytes.is_empty() {
        return Err(ServiceError::Decoding("Image payload is empty.".into()));
    }

    let img = image::load_from_memory(bytes).map_err(decode_error)?;
    let rgb = img.to_rgb8();
    let resized = imageops::resize(&rgb, target_size, target_size, RESIZE_FILTER);

    NormalizedTensor::from_rgb(&resized)
        .ok_or_else(|| ServiceError::Decoding("Unexpected image decoding error.".into()))
}

fn decode_error(err: ImageError) -> ServiceError {
    tracing::debug!(error = %err, "image decode failed");
    match err {
        ImageError::Unsupported(_) | ImageError::Decoding(_) => {
            ServiceError::Decoding("Image content could not be decoded.".into())
        }
        _ => ServiceError::Decoding("Unexpected image decoding error.".into()),
    }
}
