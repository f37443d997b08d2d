use crate::network::Network;
use crate::preprocess::NormalizedTensor;

pub type PredictorError = Box<dyn std::error::Error + Send + Sync>;

/// A loaded prediction function.
///
/// Implementations are shared across worker threads and called concurrently
/// through `&self`; anything that cannot tolerate that must lock internally.
pub trait Predictor: Send + Sync {
    /// Runs the model on one tensor and returns one probability row per
    /// batch element.
    fn predict(&self, input: &NormalizedTensor) -> Result<Vec<Vec<f32>>, PredictorError>;

    /// Width of the probability row, when known up front.
    fn output_size(&self) -> Option<usize> {
        None
    }
}

impl Predictor for Network {
    fn predict(&self, input: &NormalizedTensor) -> Result<Vec<Vec<f32>>, PredictorError> {
        let row: Vec<f64> = input.as_slice().iter().map(|&v| f64::from(v)).collect();
        let output = self.forward(&row)?;
        Ok(vec![output.into_iter().map(|v| v as f32).collect()])
    }

    fn output_size(&self) -> Option<usize> {
        Some(Network::output_size(self))
    }
}
