use serde::{Serialize, Deserialize};

use crate::activation::{softmax, ActivationFunction};
use crate::math::Matrix;

/// Fully connected layer: `a = f(x · W + b)`.
///
/// `weights` is `input_size × size`, `biases` is `1 × size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
}

impl Layer {
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> Layer {
        Layer {
            size,
            weights: Matrix::xavier(input_size, size),
            biases: Matrix::zeros(1, size),
            activator: activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// True when weights and biases agree with `size` and are rectangular.
    pub fn is_well_formed(&self) -> bool {
        self.weights.is_rectangular()
            && self.biases.is_rectangular()
            && self.weights.cols == self.size
            && self.biases.rows == 1
            && self.biases.cols == self.size
    }

    /// Pure forward pass for a single row. The caller guarantees
    /// `input.len() == self.input_size()`.
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let x = Matrix::from_data(vec![input.to_vec()]);
        let z = &x * &self.weights + self.biases.clone();
        let a = z.map(|v| self.activator.function(v));
        let row = a.data.into_iter().next().unwrap_or_default();
        if self.activator.is_softmax() {
            softmax(&row)
        } else {
            row
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_layer(activation: ActivationFunction) -> Layer {
        Layer {
            size: 2,
            weights: Matrix::from_data(vec![vec![1.0, -1.0], vec![2.0, 0.5]]),
            biases: Matrix::from_data(vec![vec![0.5, 0.0]]),
            activator: activation,
        }
    }

    #[test]
    fn identity_forward_is_affine() {
        let out = fixed_layer(ActivationFunction::Identity).forward(&[1.0, 1.0]);
        assert_eq!(out, vec![3.5, -0.5]);
    }

    #[test]
    fn relu_forward_clamps_negatives() {
        let out = fixed_layer(ActivationFunction::ReLU).forward(&[1.0, 1.0]);
        assert_eq!(out, vec![3.5, 0.0]);
    }

    #[test]
    fn softmax_forward_is_a_distribution() {
        let out = fixed_layer(ActivationFunction::Softmax).forward(&[1.0, 1.0]);
        assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(out[0] > out[1]);
    }

    #[test]
    fn new_layer_is_well_formed() {
        let layer = Layer::new(5, 12, ActivationFunction::Tanh);
        assert!(layer.is_well_formed());
        assert_eq!(layer.input_size(), 12);
    }
}
