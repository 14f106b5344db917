//! Loss functions coupled with an output-layer gradient rule. Each loss
//! exposes `compute` (for reporting) and `output_gradient` (the `dL/dz`
//! written into the output layer's local gradient).

use crate::activations::Activation;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Loss {
    Mse,
    Bce,
    BceSigmoid,
    CceSoftmax,
}

impl Loss {
    /// Resolves the JSON `loss_function` name against the network's
    /// output activation: `BinaryCrossEntropy` fuses with a sigmoid
    /// output and otherwise falls back to generic BCE;
    /// `CategoricalCrossEntropy` always fuses with softmax; anything
    /// else (including unknown names) is MSE.
    pub fn from_config_name(name: &str, output_activation: Activation) -> Self {
        match name {
            "BinaryCrossEntropy" => {
                if output_activation == Activation::Sigmoid {
                    Loss::BceSigmoid
                } else {
                    Loss::Bce
                }
            }
            "CategoricalCrossEntropy" => Loss::CceSoftmax,
            _ => Loss::Mse,
        }
    }

    /// Scalar loss for one sample, used for validation reporting.
    pub fn compute(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        debug_assert_eq!(predicted.len(), expected.len());
        match self {
            Loss::Mse => {
                let sum: f64 = predicted
                    .iter()
                    .zip(expected)
                    .map(|(&p, &y)| (p - y) * (p - y))
                    .sum();
                sum / predicted.len() as f64
            }
            Loss::Bce | Loss::BceSigmoid => {
                let mut sum = 0.0;
                for (&p, &y) in predicted.iter().zip(expected) {
                    let clamped = clamp_prob(p);
                    sum -= y * clamped.ln() + (1.0 - y) * (1.0 - clamped).ln();
                }
                sum
            }
            Loss::CceSoftmax => {
                let mut sum = 0.0;
                for (&p, &y) in predicted.iter().zip(expected) {
                    sum -= y * p.max(f64::MIN_POSITIVE).ln();
                }
                sum
            }
        }
    }

    /// Writes `dL/dz` for the output layer into `local_gradient`.
    ///
    /// The fused rules (`BceSigmoid`, `CceSoftmax`) assume the output
    /// layer's activation matches the pair name and write `p - y`
    /// directly. The generic rules (`Mse`, `Bce`) compute `dL/da` and
    /// then apply the output layer's own activation derivative.
    pub fn output_gradient(
        &self,
        output_activation: Activation,
        preactivation: &[f64],
        activation: &[f64],
        expected: &[f64],
        local_gradient: &mut [f64],
    ) {
        debug_assert_eq!(activation.len(), expected.len());
        debug_assert_eq!(activation.len(), local_gradient.len());
        match self {
            Loss::Mse => {
                for ((g, &p), &y) in local_gradient.iter_mut().zip(activation).zip(expected) {
                    *g = p - y;
                }
                output_activation.derivative(preactivation, activation, local_gradient);
            }
            Loss::Bce => {
                for ((g, &p), &y) in local_gradient.iter_mut().zip(activation).zip(expected) {
                    let clamped = clamp_prob(p);
                    *g = (clamped - y) / (clamped * (1.0 - clamped));
                }
                output_activation.derivative(preactivation, activation, local_gradient);
            }
            Loss::BceSigmoid | Loss::CceSoftmax => {
                for ((g, &p), &y) in local_gradient.iter_mut().zip(activation).zip(expected) {
                    *g = p - y;
                }
            }
        }
    }
}

/// Clamps a probability into `[DBL_MIN, 1 - DBL_EPSILON]` to keep BCE's
/// logarithms and the generic gradient's denominator finite.
fn clamp_prob(p: f64) -> f64 {
    p.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON)
}
