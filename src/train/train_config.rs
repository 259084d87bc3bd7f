use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Loop hyperparameters for `run`.
///
/// - `epochs`          — full passes over the dataset
/// - `batch_size`      — examples per mini-batch; `1` gives online SGD
/// - `report_interval` — global steps between diagnostic records
///
/// All three must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub report_interval: usize,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, report_interval: usize) -> Self {
        TrainConfig { epochs, batch_size, report_interval }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("epochs", self.epochs),
            ("batch_size", self.batch_size),
            ("report_interval", self.report_interval),
        ] {
            if value == 0 {
                return Err(Error::invalid_config(format!("{name} must be a positive integer")));
            }
        }
        Ok(())
    }

    /// Number of optimizer steps one epoch over `dataset_len` examples takes.
    pub fn steps_per_epoch(&self, dataset_len: usize) -> usize {
        dataset_len.div_ceil(self.batch_size.max(1))
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig { epochs: 10, batch_size: 32, report_interval: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_zero_field_is_rejected() {
        for cfg in [
            TrainConfig::new(0, 1, 1),
            TrainConfig::new(1, 0, 1),
            TrainConfig::new(1, 1, 0),
        ] {
            assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        }
        TrainConfig::new(1, 1, 1).validate().unwrap();
    }

    #[test]
    fn test_steps_per_epoch_rounds_up() {
        let cfg = TrainConfig::new(1, 25, 1);
        assert_eq!(cfg.steps_per_epoch(100), 4);
        assert_eq!(cfg.steps_per_epoch(101), 5);
        assert_eq!(cfg.steps_per_epoch(0), 0);
    }
}
