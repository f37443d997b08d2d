pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod error;
pub mod preprocess;
pub mod advisor;
pub mod runtime;
pub mod pipeline;
pub mod config;

// Convenience re-exports
pub use math::Matrix;
pub use activation::ActivationFunction;
pub use layers::Layer;
pub use network::{InputType, ModelMetadata, Network, NetworkError};
pub use error::ServiceError;
pub use preprocess::{decode_base64, normalize, validate_filename, NormalizedTensor};
pub use advisor::{advise, AdvisoryTier};
pub use runtime::{ModelRuntime, PredictionResult, Predictor, PredictorError};
pub use pipeline::{Diagnosis, ImageSource, InferencePipeline};
pub use config::Settings;
