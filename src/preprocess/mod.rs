//! Turns request payloads into model-ready tensors.
//!
//! Upload path: [`validate_filename`] then [`normalize`].
//! Camera path: [`decode_base64`] then [`normalize`].

pub mod filename;
pub mod image;
pub mod payload;
pub mod tensor;

pub use self::filename::{validate_filename, ALLOWED_EXTENSIONS};
pub use self::image::normalize;
pub use self::payload::decode_base64;
pub use self::tensor::NormalizedTensor;
