use serde::{Serialize, Deserialize};

/// One progress record emitted by `run` every `report_interval` steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based epoch the reporting step fell in.
    pub epoch: usize,
    /// 1-based global step count across all epochs.
    pub step: usize,
    /// Running loss divided by `report_interval`.
    pub average_loss: f64,
}

/// Result of `evaluate` over a full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Example-weighted mean of batch losses.
    pub mean_loss: f64,
    /// Fraction in [0, 1] of rows whose argmax matches the label; only set
    /// for multi-column predictions.
    pub accuracy: Option<f64>,
}
