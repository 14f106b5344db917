//! A dense (fully-connected) layer: owns its weights and biases. All
//! computation is driven by `batch::BatchBuffer` and `optimizer::AdamW`,
//! which borrow into these arrays.

use crate::activations::Activation;
use crate::init::Initializer;
use crate::rng::NeuroxRng;

/// A dense transformation from `input_size` inputs to `output_size`
/// outputs. `weights` is `output_size x input_size`, row-major (row =
/// output neuron); `biases` has length `output_size`.
pub struct Layer {
    pub input_size: usize,
    pub output_size: usize,
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

impl Layer {
    /// Allocates `weights` and `biases` and populates them via
    /// `initializer`, drawing weights before biases from `rng`.
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        initializer: Initializer,
        rng: &mut NeuroxRng,
    ) -> Self {
        let mut weights = vec![0.0; output_size * input_size];
        let mut biases = vec![0.0; output_size];
        initializer.populate(&mut weights, &mut biases, input_size, output_size, rng);
        Self {
            input_size,
            output_size,
            weights,
            biases,
            activation,
        }
    }

    /// Total trainable parameters: `output_size * input_size + output_size`.
    pub fn parameter_count(&self) -> usize {
        self.output_size * self.input_size + self.output_size
    }

    /// The weight connecting input neuron `i` to output neuron `j`.
    #[inline]
    pub fn weight(&self, j: usize, i: usize) -> f64 {
        self.weights[j * self.input_size + i]
    }
}
