//! Model lifecycle: load once at startup, predict many times.

pub mod model_runtime;
pub mod predictor;

pub use model_runtime::{argmax, ModelRuntime, PredictionResult};
pub use predictor::{Predictor, PredictorError};
