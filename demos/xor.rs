use neurox::activations::Activation;
use neurox::init::Initializer;
use neurox::loss::Loss;
use neurox::network::{LayerSpec, Network};
use neurox::train::{self, TrainingParams};
use neurox::{AdamW, NeuroxRng};

fn main() {
    let specs = vec![
        LayerSpec { units: 6, activation: Activation::Tanh, initializer: Initializer::Xavier },
        LayerSpec { units: 1, activation: Activation::Sigmoid, initializer: Initializer::Xavier },
    ];

    let mut rng = NeuroxRng::new(0xC0FFEE);
    let mut network = Network::new(2, &specs, Loss::BceSigmoid, &mut rng).expect("network construction failed");
    let mut optimizer = AdamW::new(network.parameter_count, 0.05, 0.8, 0.99, 1e-8, 1e-4, true);

    let base = [
        vec![0.0, 0.0, 0.0],
        vec![0.0, 1.0, 1.0],
        vec![1.0, 0.0, 1.0],
        vec![1.0, 1.0, 0.0],
    ];
    let mut rows = Vec::new();
    for _ in 0..20 {
        rows.extend_from_slice(&base);
    }
    let split_at = (rows.len() as f64 * 0.8).floor() as usize;
    let mut train_rows = rows[..split_at].to_vec();
    let validation_rows = rows[split_at..].to_vec();

    println!("Starting XOR training (small network)...");
    train::train(
        &mut network,
        &mut optimizer,
        &mut train_rows,
        &validation_rows,
        &TrainingParams { epoch_count: 600, batch_size: 4 },
        &mut rng,
        |epoch, loss| {
            if epoch % 100 == 0 {
                println!("epoch {epoch}: validation loss {loss:.6}");
            }
        },
    );

    let mut out = [0.0];
    for sample in &base {
        let (x, y) = sample.split_at(2);
        train::infer(&network, x, &mut out);
        println!("input {x:?} -> predicted {:.4} (expected {})", out[0], y[0]);
    }
}
