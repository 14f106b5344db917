//! The epoch/mini-batch training loop: shuffles the training split each
//! epoch, accumulates per-batch gradients, and reports validation loss.

use crate::batch::BatchBuffer;
use crate::data::split_row;
use crate::network::Network;
use crate::optimizer::AdamW;
use crate::rng::NeuroxRng;

pub struct TrainingParams {
    pub epoch_count: usize,
    pub batch_size: usize,
}

/// Runs the full training procedure over `train_rows`/`validation_rows`
/// (already split 80/20 by the caller). `batch_size` buffers are
/// allocated once and reused across every mini-batch. A trailing batch
/// smaller than `batch_size` is dropped. `loss_sink` receives
/// `(epoch, avg_validation_loss)` once per epoch, including a final call
/// at `epoch_count`.
pub fn train(
    network: &mut Network,
    optimizer: &mut AdamW,
    train_rows: &mut [Vec<f64>],
    validation_rows: &[Vec<f64>],
    params: &TrainingParams,
    rng: &mut NeuroxRng,
    mut loss_sink: impl FnMut(usize, f64),
) {
    let batch_size = params.batch_size.max(1);
    let mut buffers: Vec<BatchBuffer> = (0..batch_size).map(|_| BatchBuffer::new(network)).collect();
    let mut accum = vec![0.0; network.parameter_count];

    for epoch in 0..params.epoch_count {
        loss_sink(epoch, validation_loss(network, validation_rows));

        rng.shuffle_rows(train_rows);

        let mut batch_start = 0;
        while batch_start + batch_size <= train_rows.len() {
            let batch = &train_rows[batch_start..batch_start + batch_size];
            accum.iter_mut().for_each(|g| *g = 0.0);

            for (slot, row) in buffers.iter_mut().zip(batch.iter()) {
                let (x, y) = split_row(row, network.input_size);
                slot.forward_f64(network, x);
                slot.output_gradient(network, y);
                slot.backward(network);
                slot.accumulate(network, x, &mut accum);
            }

            optimizer.step(network, &accum);
            batch_start += batch_size;
        }
    }

    loss_sink(params.epoch_count, validation_loss(network, validation_rows));
}

/// The unweighted mean per-sample loss over `rows`, per spec's reporting
/// rule. Returns `0.0` for an empty validation set.
pub fn validation_loss(network: &Network, rows: &[Vec<f64>]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let mut buf = BatchBuffer::new(network);
    let mut sum = 0.0;
    for row in rows {
        let (x, y) = split_row(row, network.input_size);
        buf.forward_f64(network, x);
        sum += network.loss.compute(buf.output(), y);
    }
    sum / rows.len() as f64
}

/// Runs a forward pass for inference, copying the final activation
/// vector into `out`.
pub fn infer(network: &Network, x: &[f64], out: &mut [f64]) {
    let mut buf = BatchBuffer::new(network);
    buf.forward_f64(network, x);
    out.copy_from_slice(buf.output());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activations::Activation;
    use crate::config;
    use crate::init::Initializer;
    use crate::loss::Loss;
    use crate::network::LayerSpec;

    fn xor_dataset() -> Vec<Vec<f64>> {
        // 4 base patterns, repeated to give the 80/20 split room to work with.
        let base = [
            vec![0.0, 0.0, 0.0],
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ];
        let mut rows = Vec::new();
        for _ in 0..10 {
            rows.extend_from_slice(&base);
        }
        rows
    }

    #[test]
    fn training_reduces_validation_loss() {
        let specs = vec![
            LayerSpec { units: 6, activation: Activation::Tanh, initializer: Initializer::Xavier },
            LayerSpec { units: 1, activation: Activation::Sigmoid, initializer: Initializer::Xavier },
        ];
        let mut rng = NeuroxRng::new(11);
        let mut network = Network::new(2, &specs, Loss::BceSigmoid, &mut rng).unwrap();
        let mut optimizer = AdamW::new(network.parameter_count, 0.05, 0.8, 0.99, 1e-8, 1e-4, true);

        let rows = xor_dataset();
        let split_at = (rows.len() as f64 * 0.8).floor() as usize;
        let mut train_rows = rows[..split_at].to_vec();
        let validation_rows = rows[split_at..].to_vec();

        let mut losses = Vec::new();
        train(
            &mut network,
            &mut optimizer,
            &mut train_rows,
            &validation_rows,
            &TrainingParams { epoch_count: 200, batch_size: 4 },
            &mut rng,
            |epoch, loss| losses.push((epoch, loss)),
        );

        assert_eq!(losses.len(), 201);
        let first_loss = losses.first().unwrap().1;
        let last_loss = losses.last().unwrap().1;
        assert!(last_loss < first_loss, "loss did not decrease: {first_loss} -> {last_loss}");
    }

    #[test]
    fn partial_trailing_batch_is_dropped() {
        let specs = vec![LayerSpec { units: 1, activation: Activation::Linear, initializer: Initializer::Xavier }];
        let mut rng = NeuroxRng::new(2);
        let mut network = Network::new(1, &specs, Loss::Mse, &mut rng).unwrap();
        let mut optimizer = AdamW::new(network.parameter_count, 0.01, 0.8, 0.99, 1e-8, 0.0, true);

        // 7 training rows with batch_size 3 leaves one trailing row unused.
        let mut train_rows: Vec<Vec<f64>> = (0..7).map(|i| vec![i as f64, i as f64]).collect();
        let validation_rows: Vec<Vec<f64>> = vec![vec![1.0, 1.0]];

        let mut loss_reports = 0;
        train(
            &mut network,
            &mut optimizer,
            &mut train_rows,
            &validation_rows,
            &TrainingParams { epoch_count: 1, batch_size: 3 },
            &mut rng,
            |_, _| loss_reports += 1,
        );

        // 7 rows at batch_size 3 is two full batches (6 rows); the
        // trailing row is dropped, so the optimizer steps exactly twice.
        assert_eq!(optimizer.step_count(), 2);
        // loss is reported once per epoch plus once after the final epoch.
        assert_eq!(loss_reports, 2);
    }

    #[test]
    fn determinism_same_seed_same_losses() {
        let specs = vec![
            LayerSpec { units: 4, activation: Activation::Tanh, initializer: Initializer::Xavier },
            LayerSpec { units: 1, activation: Activation::Sigmoid, initializer: Initializer::Xavier },
        ];
        let rows = xor_dataset();
        let split_at = (rows.len() as f64 * 0.8).floor() as usize;

        let run = |seed: u64| {
            let mut rng = NeuroxRng::new(seed);
            let mut network = Network::new(2, &specs, Loss::BceSigmoid, &mut rng).unwrap();
            let mut optimizer = AdamW::new(network.parameter_count, 0.05, 0.8, 0.99, 1e-8, 1e-4, true);
            let mut train_rows = rows[..split_at].to_vec();
            let validation_rows = rows[split_at..].to_vec();
            let mut losses = Vec::new();
            train(
                &mut network,
                &mut optimizer,
                &mut train_rows,
                &validation_rows,
                &TrainingParams { epoch_count: 20, batch_size: 4 },
                &mut rng,
                |epoch, loss| losses.push((epoch, loss)),
            );
            losses
        };

        let a = run(99);
        let b = run(99);
        assert_eq!(a, b);
    }

    #[test]
    fn infer_output_matches_forward_width() {
        let json = r#"{
            "input_size": 2,
            "layers": [{"units": 3, "activation": "ReLU"}, {"units": 2, "activation": "Softmax"}],
            "loss_function": "CategoricalCrossEntropy",
            "training": {"train_dataset": "a.csv", "test_dataset": "b.csv"}
        }"#;
        let cfg = config::parse(json).unwrap();
        let mut rng = NeuroxRng::new(4);
        let network = Network::new(cfg.input_size, &cfg.layer_specs, cfg.loss, &mut rng).unwrap();
        let mut out = vec![0.0; network.output_size()];
        infer(&network, &[0.1, 0.2], &mut out);
        assert_eq!(out.len(), 2);
    }
}
