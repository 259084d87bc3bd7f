//! Trains a small classifier on synthetic two-blob data.
//!
//!   ferrite-train [run.json] [model_out.json]
//!
//! Without arguments a built-in run is used. Diagnostics are written to
//! stdout as JSON lines; set `RUST_LOG=info` (or `debug`) for progress logs.
use std::env;

use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use ferrite_train::{
    evaluate, run, ActivationFunction, Error, InMemoryDataset, LayerSpec, LossType, Matrix,
    Network, NetworkSpec, OptimizerSpec, Result, RunSpec, TrainConfig,
};

const EXAMPLES: usize = 200;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let spec = match args.first() {
        Some(path) => {
            info!("loading run spec from {path}");
            RunSpec::load_json(path)?
        }
        None => default_spec(),
    };

    let mut dataset = blobs(&spec.network, EXAMPLES, spec.seed)?;
    if spec.shuffle {
        dataset = dataset.with_shuffle(spec.seed);
    }

    let mut network = Network::from_spec(&spec.network, spec.seed)?;
    let loss_fn = spec.network.loss.build();
    let mut optimizer = spec.optimizer.build()?;

    let diagnostics = match run(&mut network, &loss_fn, &mut optimizer, &mut dataset, &spec.train) {
        Ok(diagnostics) => diagnostics,
        Err(failed) => {
            // Completed steps keep their records.
            for record in &failed.diagnostics {
                println!("{}", serde_json::to_string(record)?);
            }
            return Err(failed.source);
        }
    };
    for record in &diagnostics {
        println!("{}", serde_json::to_string(record)?);
    }

    let eval = evaluate(&mut network, &loss_fn, &mut dataset, spec.train.batch_size)?;
    println!("{}", serde_json::to_string(&eval)?);

    if let Some(out) = args.get(1) {
        network.save_json(out)?;
        info!("saved '{}' to {out}", spec.network.name);
    }
    Ok(())
}

fn default_spec() -> RunSpec {
    RunSpec {
        network: NetworkSpec {
            name: "blobs".into(),
            layers: vec![
                LayerSpec { size: 8, input_size: 2, activation: ActivationFunction::ReLU },
                LayerSpec { size: 2, input_size: 8, activation: ActivationFunction::Identity },
            ],
            loss: LossType::CrossEntropy,
        },
        optimizer: OptimizerSpec::Momentum { learning_rate: 0.05, momentum: 0.9 },
        train: TrainConfig::new(20, 25, 8),
        seed: 7,
        shuffle: true,
    }
}

/// Two Gaussian blobs centred on (-1, -1) and (1, 1). Labels are shaped for
/// the network's loss: class indices for cross-entropy, one-hot rows for
/// multi-output heads, a 0/1 column otherwise.
fn blobs(spec: &NetworkSpec, n: usize, seed: u64) -> Result<InMemoryDataset> {
    if spec.input_size() != 2 {
        return Err(Error::invalid_config(format!(
            "the synthetic dataset has 2 features, network '{}' expects {}",
            spec.name,
            spec.input_size()
        )));
    }
    let outputs = spec.output_size();
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut inputs = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);

    for i in 0..n {
        let class = i % 2;
        let centre = if class == 0 { -1.0 } else { 1.0 };
        inputs.push(vec![
            centre + rng.gen_range(-0.8..0.8),
            centre + rng.gen_range(-0.8..0.8),
        ]);
        labels.push(match (spec.loss, outputs) {
            (LossType::CrossEntropy, _) | (_, 1) => vec![class as f64],
            _ => (0..outputs).map(|j| if j == class { 1.0 } else { 0.0 }).collect(),
        });
    }

    InMemoryDataset::new(Matrix::from_rows(&inputs)?, Matrix::from_rows(&labels)?)
}
