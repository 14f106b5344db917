//! Element-wise activation functions and their derivatives, operating
//! directly on a layer's preactivation/activation scratch slices.

use serde::Deserialize;

/// An activation function selected per layer. Softmax is a row (whole
/// output vector) reduction rather than an element-wise map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Activation {
    Linear,
    Sigmoid,
    Tanh,
    Relu,
    LeakyRelu,
    Swish,
    Softmax,
}

impl Activation {
    /// Unknown JSON activation names fall back to `Linear`.
    pub fn from_config_name(name: &str) -> Self {
        match name {
            "Sigmoid" => Activation::Sigmoid,
            "Tanh" => Activation::Tanh,
            "ReLU" => Activation::Relu,
            "LeakyReLU" => Activation::LeakyRelu,
            "Swish" => Activation::Swish,
            "Softmax" => Activation::Softmax,
            _ => Activation::Linear,
        }
    }

    /// Computes `out = sigma(preactivation)`.
    pub fn forward(&self, preactivation: &[f64], out: &mut [f64]) {
        debug_assert_eq!(preactivation.len(), out.len());
        match self {
            Activation::Linear => out.copy_from_slice(preactivation),
            Activation::Sigmoid => {
                for (o, &z) in out.iter_mut().zip(preactivation) {
                    *o = sigmoid(z);
                }
            }
            Activation::Tanh => {
                for (o, &z) in out.iter_mut().zip(preactivation) {
                    *o = z.tanh();
                }
            }
            Activation::Relu => {
                for (o, &z) in out.iter_mut().zip(preactivation) {
                    *o = z.max(0.0);
                }
            }
            Activation::LeakyRelu => {
                for (o, &z) in out.iter_mut().zip(preactivation) {
                    *o = if z > 0.0 { z } else { 0.01 * z };
                }
            }
            Activation::Swish => {
                for (o, &z) in out.iter_mut().zip(preactivation) {
                    *o = z * sigmoid(z);
                }
            }
            Activation::Softmax => softmax(preactivation, out),
        }
    }

    /// Multiplies `local_gradient` in place by `dsigma/dz`, converting an
    /// incoming `dL/da` into `dL/dz`. Softmax's generic derivative is the
    /// identity here; the fused loss rules produce `dL/dz` directly.
    pub fn derivative(&self, preactivation: &[f64], activation: &[f64], local_gradient: &mut [f64]) {
        debug_assert_eq!(preactivation.len(), local_gradient.len());
        debug_assert_eq!(activation.len(), local_gradient.len());
        match self {
            Activation::Linear | Activation::Softmax => {}
            Activation::Sigmoid => {
                for (g, &a) in local_gradient.iter_mut().zip(activation) {
                    *g *= a * (1.0 - a);
                }
            }
            Activation::Tanh => {
                for (g, &a) in local_gradient.iter_mut().zip(activation) {
                    *g *= 1.0 - a * a;
                }
            }
            Activation::Relu => {
                for (g, &z) in local_gradient.iter_mut().zip(preactivation) {
                    *g *= if z > 0.0 { 1.0 } else { 0.0 };
                }
            }
            Activation::LeakyRelu => {
                for (g, &z) in local_gradient.iter_mut().zip(preactivation) {
                    *g *= if z > 0.0 { 1.0 } else { 0.01 };
                }
            }
            Activation::Swish => {
                for i in 0..local_gradient.len() {
                    let s = sigmoid(preactivation[i]);
                    let a = activation[i];
                    local_gradient[i] *= a + s * (1.0 - a);
                }
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Numerically stable softmax: subtract the row max before exponentiating.
fn softmax(preactivation: &[f64], out: &mut [f64]) {
    let max = preactivation.iter().fold(f64::NEG_INFINITY, |m, &z| m.max(z));
    let mut sum = 0.0;
    for (o, &z) in out.iter_mut().zip(preactivation) {
        *o = (z - max).exp();
        sum += *o;
    }
    for o in out.iter_mut() {
        *o /= sum;
    }
}
