use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activation::ActivationFunction;
use crate::layers::Layer;
use crate::network::metadata::ModelMetadata;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("artifact i/o")]
    Io(#[from] std::io::Error),

    #[error("artifact json")]
    Json(#[from] serde_json::Error),

    #[error("network has no layers")]
    Empty,

    #[error("layer {layer} is malformed: expected input {expected}, found {found}")]
    ShapeMismatch { layer: usize, expected: usize, found: usize },

    #[error("input length mismatch: expected {expected}, found {found}")]
    InputLength { expected: usize, found: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl Network {
    /// Builds a network from (size, input_size, activation) tuples.
    pub fn new(layer_specs: Vec<(usize, usize, ActivationFunction)>) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation))
            .collect();
        Network { layers, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Network {
        self.metadata = Some(metadata);
        self
    }

    /// Width of the flat input row, or 0 for an empty network.
    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    /// Width of the output row, or 0 for an empty network.
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Checks that the network is non-empty and each layer consumes what the
    /// previous one produces.
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.layers.is_empty() {
            return Err(NetworkError::Empty);
        }
        let mut expected = self.input_size();
        for (i, layer) in self.layers.iter().enumerate() {
            if !layer.is_well_formed() || layer.input_size() != expected {
                return Err(NetworkError::ShapeMismatch {
                    layer: i,
                    expected,
                    found: layer.input_size(),
                });
            }
            expected = layer.size;
        }
        Ok(())
    }

    /// Forward pass over one input row. Takes `&self` and keeps no scratch
    /// state, so concurrent callers may share one network.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if self.layers.is_empty() {
            return Err(NetworkError::Empty);
        }
        if input.len() != self.input_size() {
            return Err(NetworkError::InputLength {
                expected: self.input_size(),
                found: input.len(),
            });
        }
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current);
        }
        Ok(current)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), NetworkError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network, NetworkError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
