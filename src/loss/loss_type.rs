use serde::{Serialize, Deserialize};

use crate::loss::{
    bce::BceLoss, cross_entropy::CrossEntropyLoss, huber::HuberLoss, loss_fn::LossFunction,
    mae::MaeLoss, mse::MseLoss,
};

/// Selects a loss from configuration.
///
/// - `Mse`                — pair with Identity or Sigmoid output.
/// - `CrossEntropy`       — pair with an Identity (logit) output; labels are
///   class indices or one-hot rows.
/// - `BinaryCrossEntropy` — pair with Sigmoid output.
/// - `Mae`                — pair with Identity output.
/// - `Huber`              — δ = 1, pair with Identity output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    CrossEntropy,
    BinaryCrossEntropy,
    Mae,
    Huber,
}

impl LossType {
    pub fn build(self) -> Box<dyn LossFunction> {
        match self {
            LossType::Mse                => Box::new(MseLoss),
            LossType::CrossEntropy       => Box::new(CrossEntropyLoss),
            LossType::BinaryCrossEntropy => Box::new(BceLoss),
            LossType::Mae                => Box::new(MaeLoss),
            LossType::Huber              => Box::new(HuberLoss),
        }
    }
}
