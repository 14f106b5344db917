//! The network: an ordered sequence of layers, a fixed input width, and
//! a selected loss. Owns its layers exclusively; mutated only by
//! initialization (once) and the optimizer (per step).

use crate::activations::Activation;
use crate::errors::{NeuroxError, NeuroxResult};
use crate::init::Initializer;
use crate::layers::Layer;
use crate::loss::Loss;
use crate::rng::NeuroxRng;

/// One layer's architectural description, as parsed from configuration.
#[derive(Clone, Copy, Debug)]
pub struct LayerSpec {
    pub units: usize,
    pub activation: Activation,
    pub initializer: Initializer,
}

pub struct Network {
    pub input_size: usize,
    pub layers: Vec<Layer>,
    pub loss: Loss,
    pub parameter_count: usize,
}

impl Network {
    /// Builds a network of layers with a matching fan-in chain: the
    /// first layer's input size is `input_size`, and each subsequent
    /// layer's input size is the previous layer's output size.
    pub fn new(input_size: usize, specs: &[LayerSpec], loss: Loss, rng: &mut NeuroxRng) -> NeuroxResult<Self> {
        if input_size == 0 {
            return Err(NeuroxError::Config("input_size must be > 0".into()));
        }
        if specs.is_empty() {
            return Err(NeuroxError::Config("network must have at least one layer".into()));
        }
        let mut layers = Vec::with_capacity(specs.len());
        let mut fan_in = input_size;
        for spec in specs {
            if spec.units == 0 {
                return Err(NeuroxError::Config("layer units must be > 0".into()));
            }
            layers.push(Layer::new(fan_in, spec.units, spec.activation, spec.initializer, rng));
            fan_in = spec.units;
        }
        let parameter_count = layers.iter().map(Layer::parameter_count).sum();
        Ok(Self {
            input_size,
            layers,
            loss,
            parameter_count,
        })
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.output_size).unwrap_or(0)
    }

    pub fn output_activation(&self) -> Activation {
        self.layers.last().map(|l| l.activation).unwrap_or(Activation::Linear)
    }

    /// The flat-vector offset of layer `layer_idx`'s first parameter
    /// (its first bias), under the canonical ordering: for each layer in
    /// order, biases first then row-major weights.
    pub fn param_offset(&self, layer_idx: usize) -> usize {
        self.layers[..layer_idx].iter().map(Layer::parameter_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::Loss;

    fn specs() -> Vec<LayerSpec> {
        vec![
            LayerSpec { units: 4, activation: Activation::Tanh, initializer: Initializer::Xavier },
            LayerSpec { units: 2, activation: Activation::Sigmoid, initializer: Initializer::Xavier },
        ]
    }

    #[test]
    fn parameter_count_is_sum_over_layers() {
        let mut rng = NeuroxRng::new(5);
        let net = Network::new(3, &specs(), Loss::Mse, &mut rng).unwrap();
        let expected = (3 * 4 + 4) + (4 * 2 + 2);
        assert_eq!(net.parameter_count, expected);
    }

    #[test]
    fn fan_in_chain_matches_previous_output() {
        let mut rng = NeuroxRng::new(5);
        let net = Network::new(3, &specs(), Loss::Mse, &mut rng).unwrap();
        assert_eq!(net.layers[0].input_size, 3);
        assert_eq!(net.layers[1].input_size, net.layers[0].output_size);
    }

    #[test]
    fn rejects_zero_input_size() {
        let mut rng = NeuroxRng::new(1);
        assert!(Network::new(0, &specs(), Loss::Mse, &mut rng).is_err());
    }
}
