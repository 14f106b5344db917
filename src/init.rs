//! Parameter initializers, applied once per layer at network construction.

use crate::rng::NeuroxRng;
use serde::Deserialize;

/// An initializer selected per layer. Draws weights before biases from
/// the network's single seeded stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Initializer {
    Xavier,
    He,
}

impl Initializer {
    /// Unknown JSON initializer names fall back to `Xavier`.
    pub fn from_config_name(name: &str) -> Self {
        match name {
            "He" => Initializer::He,
            _ => Initializer::Xavier,
        }
    }

    /// Populates `weights` (length `fan_out * fan_in`) and `biases`
    /// (length `fan_out`), weights first, per the canonical draw order.
    pub fn populate(&self, weights: &mut [f64], biases: &mut [f64], fan_in: usize, fan_out: usize, rng: &mut NeuroxRng) {
        match self {
            Initializer::Xavier => {
                let delta = (6.0 / (fan_in as f64 + fan_out as f64)).sqrt();
                for w in weights.iter_mut() {
                    *w = rng.uniform(-delta, delta);
                }
                for b in biases.iter_mut() {
                    *b = rng.uniform(-delta, delta);
                }
            }
            Initializer::He => {
                let std_dev = (2.0 / fan_in as f64).sqrt();
                for w in weights.iter_mut() {
                    *w = rng.gaussian(0.0, std_dev);
                }
                for b in biases.iter_mut() {
                    *b = rng.gaussian(0.0, std_dev);
                }
            }
        }
    }
}
