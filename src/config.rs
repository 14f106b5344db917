//! JSON configuration schema and resolution into runtime types. Unknown
//! activation/initializer/loss names fall back to documented defaults
//! rather than failing, per the external interface contract.

use crate::activations::Activation;
use crate::errors::{NeuroxError, NeuroxResult};
use crate::init::Initializer;
use crate::loss::Loss;
use crate::network::LayerSpec;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawConfig {
    pub input_size: usize,
    pub layers: Vec<RawLayer>,
    #[serde(default)]
    pub loss_function: Option<String>,
    #[serde(default)]
    pub optimizer: RawOptimizer,
    pub training: RawTraining,
}

#[derive(Debug, Deserialize)]
pub struct RawLayer {
    pub units: usize,
    #[serde(default)]
    pub activation: Option<String>,
    #[serde(default)]
    pub init: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawOptimizer {
    #[serde(default)]
    pub learning_rate: Option<f64>,
    #[serde(default)]
    pub beta1: Option<f64>,
    #[serde(default)]
    pub beta2: Option<f64>,
    #[serde(default)]
    pub epsilon: Option<f64>,
    #[serde(default)]
    pub weight_decay: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawTraining {
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub epoch_count: Option<usize>,
    pub train_dataset: String,
    pub test_dataset: String,
}

/// AdamW hyperparameters after defaulting. AMSGrad is always enabled.
pub struct OptimizerParams {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    pub weight_decay: f64,
}

pub struct TrainingParams {
    pub batch_size: usize,
    pub epoch_count: usize,
    pub train_dataset: String,
    /// Parsed from configuration for schema fidelity; the training
    /// procedure validates only against the 80/20 split of
    /// `train_dataset` (see SPEC_FULL.md §9), so this path is not read.
    pub test_dataset: String,
}

pub struct ResolvedConfig {
    pub input_size: usize,
    pub layer_specs: Vec<LayerSpec>,
    pub loss: Loss,
    pub optimizer: OptimizerParams,
    pub training: TrainingParams,
}

pub fn parse(json: &str) -> NeuroxResult<ResolvedConfig> {
    let raw: RawConfig = serde_json::from_str(json)?;
    resolve(raw)
}

pub fn resolve(raw: RawConfig) -> NeuroxResult<ResolvedConfig> {
    if raw.layers.is_empty() {
        return Err(NeuroxError::Config("layers must not be empty".into()));
    }

    let layer_specs: Vec<LayerSpec> = raw
        .layers
        .iter()
        .map(|l| LayerSpec {
            units: l.units,
            activation: l.activation.as_deref().map(Activation::from_config_name).unwrap_or(Activation::Linear),
            initializer: l.init.as_deref().map(Initializer::from_config_name).unwrap_or(Initializer::Xavier),
        })
        .collect();

    let output_activation = layer_specs.last().map(|s| s.activation).unwrap_or(Activation::Linear);
    let loss = raw
        .loss_function
        .as_deref()
        .map(|name| Loss::from_config_name(name, output_activation))
        .unwrap_or(Loss::Mse);

    let optimizer = OptimizerParams {
        learning_rate: raw.optimizer.learning_rate.unwrap_or(2e-3),
        beta1: raw.optimizer.beta1.unwrap_or(0.8),
        beta2: raw.optimizer.beta2.unwrap_or(0.99),
        epsilon: raw.optimizer.epsilon.unwrap_or(1e-8),
        weight_decay: raw.optimizer.weight_decay.unwrap_or(1e-3),
    };

    let training = TrainingParams {
        batch_size: raw.training.batch_size.unwrap_or(1),
        epoch_count: raw.training.epoch_count.unwrap_or(100),
        train_dataset: raw.training.train_dataset,
        test_dataset: raw.training.test_dataset,
    };

    Ok(ResolvedConfig {
        input_size: raw.input_size,
        layer_specs,
        loss,
        optimizer,
        training,
    })
}
