//! The AdamW optimizer, with an optional AMSGrad variant, consuming a
//! flat per-batch gradient vector produced by `batch::BatchBuffer`.

use crate::network::Network;

/// Hyperparameters and per-parameter moment state for AdamW/AMSGrad.
/// `m`, `v`, and `v_hat` are zeroed at construction; `t` increments by
/// exactly one per `step` call.
pub struct AdamW {
    pub alpha: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    pub weight_decay: f64,
    pub amsgrad: bool,
    m: Vec<f64>,
    v: Vec<f64>,
    v_hat: Vec<f64>,
    t: u64,
}

impl AdamW {
    pub fn new(parameter_count: usize, alpha: f64, beta1: f64, beta2: f64, epsilon: f64, weight_decay: f64, amsgrad: bool) -> Self {
        Self {
            alpha,
            beta1,
            beta2,
            epsilon,
            weight_decay,
            amsgrad,
            m: vec![0.0; parameter_count],
            v: vec![0.0; parameter_count],
            v_hat: vec![0.0; parameter_count],
            t: 0,
        }
    }

    pub fn step_count(&self) -> u64 {
        self.t
    }

    /// Accessor used by tests that check AMSGrad's running max.
    pub fn v_hat(&self) -> &[f64] {
        &self.v_hat
    }

    /// Applies one AdamW step to `network`'s parameters given the flat
    /// gradient `grad` (same canonical order as the moment vectors:
    /// biases then row-major weights, per layer, layers in order).
    /// Biases are never weight-decayed.
    pub fn step(&mut self, network: &mut Network, grad: &[f64]) {
        debug_assert_eq!(grad.len(), self.m.len());
        self.t += 1;
        let cm = 1.0 / (1.0 - self.beta1.powi(self.t as i32));
        let cv = 1.0 / (1.0 - self.beta2.powi(self.t as i32));

        let mut k = 0;
        for layer in network.layers.iter_mut() {
            for j in 0..layer.output_size {
                self.update_one(k, grad[k], 0.0, &mut layer.biases[j], cm, cv);
                k += 1;
            }
            for idx in 0..layer.output_size * layer.input_size {
                self.update_one(k, grad[k], self.weight_decay, &mut layer.weights[idx], cm, cv);
                k += 1;
            }
        }
    }

    fn update_one(&mut self, k: usize, g: f64, weight_decay: f64, param: &mut f64, cm: f64, cv: f64) {
        self.m[k] = self.beta1 * self.m[k] + (1.0 - self.beta1) * g;
        self.v[k] = self.beta2 * self.v[k] + (1.0 - self.beta2) * g * g;
        let m_hat = self.m[k] * cm;
        let v_hat_candidate = self.v[k] * cv;
        self.v_hat[k] = if self.amsgrad {
            self.v_hat[k].max(v_hat_candidate)
        } else {
            v_hat_candidate
        };
        *param -= self.alpha * (m_hat / (self.v_hat[k].sqrt() + self.epsilon) + weight_decay * *param);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activations::Activation;
    use crate::init::Initializer;
    use crate::loss::Loss;
    use crate::network::{LayerSpec, Network};
    use crate::rng::NeuroxRng;

    fn tiny_network() -> Network {
        let specs = vec![LayerSpec { units: 2, activation: Activation::Linear, initializer: Initializer::Xavier }];
        let mut rng = NeuroxRng::new(1);
        Network::new(2, &specs, Loss::Mse, &mut rng).unwrap()
    }

    fn params_flat(network: &Network) -> Vec<f64> {
        let mut out = Vec::with_capacity(network.parameter_count);
        for layer in &network.layers {
            out.extend_from_slice(&layer.biases);
            out.extend_from_slice(&layer.weights);
        }
        out
    }

    #[test]
    fn no_momentum_no_amsgrad_reduces_to_signed_rescale() {
        let mut network = tiny_network();
        let n = network.parameter_count;
        let mut opt = AdamW::new(n, 0.1, 0.0, 0.0, 1e-8, 0.0, false);

        let grad: Vec<f64> = (0..n).map(|i| (i as f64 + 1.0) * 0.37 - 1.0).collect();
        let before = params_flat(&network);
        opt.step(&mut network, &grad);
        let after = params_flat(&network);

        for i in 0..n {
            let expected = before[i] - 0.1 * grad[i] / (grad[i].abs() + 1e-8);
            assert!((after[i] - expected).abs() < 1e-9, "param {i}: {} vs {}", after[i], expected);
        }
    }

    #[test]
    fn amsgrad_v_hat_is_monotonic() {
        let mut network = tiny_network();
        let n = network.parameter_count;
        let mut opt = AdamW::new(n, 0.01, 0.9, 0.99, 1e-8, 0.0, true);

        let grad_values = [0.1, 0.5, 0.2, 0.5, 0.05];
        let mut previous = vec![0.0; n];
        for &g in grad_values.iter() {
            let grad = vec![g; n];
            opt.step(&mut network, &grad);
            for (prev, current) in previous.iter().zip(opt.v_hat().iter()) {
                assert!(*current >= *prev - 1e-15, "v_hat decreased: {prev} -> {current}");
            }
            previous = opt.v_hat().to_vec();
        }
        // after the 0.5 -> ... -> 0.5 -> 0.05 sequence v_hat should have
        // latched onto the 0.5-driven peak, not drifted back down.
        assert!(opt.v_hat().iter().all(|&v| v > 0.0));
    }

    #[test]
    fn step_counter_increments_once_per_call() {
        let mut network = tiny_network();
        let n = network.parameter_count;
        let mut opt = AdamW::new(n, 0.01, 0.9, 0.99, 1e-8, 0.0, false);
        let grad = vec![0.1; n];
        for expected in 1..=5u64 {
            opt.step(&mut network, &grad);
            assert_eq!(opt.step_count(), expected);
        }
    }
}
