//! CLI entry point: reads a JSON configuration and CSV training
//! dataset, trains a network, and writes the loss log and validation
//! scatter CSVs.

use clap::Parser;
use neurox::config;
use neurox::data::{split_row, Dataset};
use neurox::errors::NeuroxResult;
use neurox::network::Network;
use neurox::optimizer::AdamW;
use neurox::report::{LossWriter, ScatterWriter};
use neurox::rng::NeuroxRng;
use neurox::train::{self, TrainingParams};
use std::path::PathBuf;
use std::process::ExitCode;

/// A reproducible default; override with `--seed` for a different draw.
const DEFAULT_SEED: u64 = 0xC0FFEE;

#[derive(Parser, Debug)]
#[command(name = "neurox", about = "Train a dense feed-forward network from a JSON config and CSV dataset")]
struct Args {
    /// Path to the JSON training configuration.
    #[arg(long)]
    config: PathBuf,

    /// Where to write the per-epoch loss CSV.
    #[arg(long, default_value = "loss.csv")]
    loss_out: PathBuf,

    /// Where to write the final validation-set prediction scatter CSV.
    #[arg(long, default_value = "scatter.csv")]
    scatter_out: PathBuf,

    /// Seed for the single PRNG stream driving initialization and shuffling.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "training failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> NeuroxResult<()> {
    let config_text = std::fs::read_to_string(&args.config)?;
    let cfg = config::parse(&config_text)?;

    tracing::debug!(test_dataset = %cfg.training.test_dataset, "test_dataset configured but not read by the training procedure");

    let output_size = cfg.layer_specs.last().map(|s| s.units).unwrap_or(0);
    let dataset = Dataset::load_csv(&cfg.training.train_dataset, cfg.input_size, output_size)?;

    let mut rng = NeuroxRng::new(args.seed);
    let mut network = Network::new(cfg.input_size, &cfg.layer_specs, cfg.loss, &mut rng)?;
    let mut optimizer = AdamW::new(
        network.parameter_count,
        cfg.optimizer.learning_rate,
        cfg.optimizer.beta1,
        cfg.optimizer.beta2,
        cfg.optimizer.epsilon,
        cfg.optimizer.weight_decay,
        true,
    );

    let (mut train_rows, validation_rows) = dataset.split(0.8);
    tracing::info!(
        train = train_rows.len(),
        validation = validation_rows.len(),
        parameters = network.parameter_count,
        "starting training"
    );

    let mut loss_writer = LossWriter::create(&args.loss_out)?;
    let params = TrainingParams {
        epoch_count: cfg.training.epoch_count,
        batch_size: cfg.training.batch_size,
    };

    let mut write_err = None;
    train::train(&mut network, &mut optimizer, &mut train_rows, &validation_rows, &params, &mut rng, |epoch, loss| {
        if write_err.is_none() {
            if let Err(e) = loss_writer.write_epoch(epoch, loss) {
                write_err = Some(e);
            }
        }
    });
    if let Some(e) = write_err {
        return Err(e);
    }
    loss_writer.flush()?;

    let mut scatter_writer = ScatterWriter::create(&args.scatter_out)?;
    let mut predicted = vec![0.0; network.output_size()];
    for row in &validation_rows {
        let (x, y) = split_row(row, network.input_size);
        train::infer(&network, x, &mut predicted);
        scatter_writer.write_row(x, y, &predicted)?;
    }
    scatter_writer.flush()?;

    Ok(())
}
