//! Per-sample forward/backward scratch and per-batch gradient
//! accumulation. A `BatchBuffer` is allocated once per batch slot and
//! reused across every mini-batch in training.

use crate::network::Network;

/// One layer's forward/backward scratch for a single sample.
struct LayerScratch {
    preactivation: Vec<f64>,
    activations: Vec<f64>,
    local_gradient: Vec<f64>,
}

impl LayerScratch {
    fn new(output_size: usize) -> Self {
        Self {
            preactivation: vec![0.0; output_size],
            activations: vec![0.0; output_size],
            local_gradient: vec![0.0; output_size],
        }
    }
}

/// Scratch for one forward+backward+accumulate cycle, one slot per
/// concurrently-processed sample in a mini-batch.
pub struct BatchBuffer {
    scratch: Vec<LayerScratch>,
}

impl BatchBuffer {
    pub fn new(network: &Network) -> Self {
        Self {
            scratch: network.layers.iter().map(|l| LayerScratch::new(l.output_size)).collect(),
        }
    }

    /// The final layer's activation vector after `forward`.
    pub fn output(&self) -> &[f64] {
        &self.scratch.last().expect("network has no layers").activations
    }

    /// Runs a forward pass: `x` feeds layer 0; each subsequent layer
    /// consumes the previous layer's activations. Writes the
    /// preactivation and activation vectors for every layer.
    pub fn forward_f64(&mut self, network: &Network, x: &[f64]) {
        debug_assert_eq!(x.len(), network.input_size);
        let mut input: &[f64] = x;
        for (layer, scratch) in network.layers.iter().zip(self.scratch.iter_mut()) {
            for j in 0..layer.output_size {
                let mut z = layer.biases[j];
                for i in 0..layer.input_size {
                    z = input[i].mul_add(layer.weight(j, i), z);
                }
                scratch.preactivation[j] = z;
            }
            layer.activation.forward(&scratch.preactivation, &mut scratch.activations);
            input = &scratch.activations;
        }
    }

    /// Fills the output layer's `local_gradient` with `dL/dz` via the
    /// network's loss rule.
    pub fn output_gradient(&mut self, network: &Network, expected: &[f64]) {
        let last = network.layers.len() - 1;
        let layer = &network.layers[last];
        let scratch = &mut self.scratch[last];
        network.loss.output_gradient(
            layer.activation,
            &scratch.preactivation,
            &scratch.activations,
            expected,
            &mut scratch.local_gradient,
        );
    }

    /// Backpropagates from the last layer to the first, filling every
    /// layer's `local_gradient` with `dL/dz`. Layer 0's local gradient is
    /// computed but unused (nothing sits behind it).
    pub fn backward(&mut self, network: &Network) {
        let n = network.layers.len();
        for k in (0..n.saturating_sub(1)).rev() {
            let next_layer = &network.layers[k + 1];
            let (left, right) = self.scratch.split_at_mut(k + 1);
            let current = &mut left[k];
            let next = &right[0];
            for i in 0..network.layers[k].output_size {
                let mut error = 0.0;
                for j in 0..next_layer.output_size {
                    error = next.local_gradient[j].mul_add(next_layer.weight(j, i), error);
                }
                current.local_gradient[i] = error;
            }
            network.layers[k]
                .activation
                .derivative(&current.preactivation, &current.activations, &mut current.local_gradient);
        }
    }

    /// Adds this sample's contribution to the flat gradient accumulator,
    /// in canonical parameter order (biases then row-major weights, per
    /// layer, layers in order). `accum` must have length
    /// `network.parameter_count` and is not zeroed here.
    pub fn accumulate(&self, network: &Network, x: &[f64], accum: &mut [f64]) {
        let mut offset = 0;
        let mut input: &[f64] = x;
        for (layer, scratch) in network.layers.iter().zip(self.scratch.iter()) {
            let bias_off = offset;
            let weight_off = offset + layer.output_size;
            for j in 0..layer.output_size {
                accum[bias_off + j] += scratch.local_gradient[j];
            }
            for j in 0..layer.output_size {
                let g = scratch.local_gradient[j];
                let row_off = weight_off + j * layer.input_size;
                for i in 0..layer.input_size {
                    accum[row_off + i] += g * input[i];
                }
            }
            offset += layer.parameter_count();
            input = &scratch.activations;
        }
    }
}
