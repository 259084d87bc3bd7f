use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::spec::NetworkSpec;
use crate::optim::optimizer::OptimizerSpec;
use crate::train::train_config::TrainConfig;

/// Everything needed to reproduce a training run, stored as one JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub network: NetworkSpec,
    pub optimizer: OptimizerSpec,
    pub train: TrainConfig,
    /// Seeds weight initialization and, when enabled, batch shuffling.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub shuffle: bool,
}

impl RunSpec {
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json(path: &str) -> Result<RunSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
