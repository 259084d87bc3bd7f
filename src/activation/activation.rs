use serde::{Serialize, Deserialize};

/// Element-wise activation applied after a dense layer's affine transform.
///
/// Classification heads use `Identity` and hand raw logits to
/// `CrossEntropyLoss`, which applies log-softmax itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Identity,
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
    Tanh,
    #[serde(rename = "leaky_relu")]
    LeakyReLU { alpha: f64 },
}

impl ActivationFunction {
    pub fn function(&self, z: f64) -> f64 {
        match *self {
            ActivationFunction::Identity => z,
            ActivationFunction::Sigmoid => sigmoid(z),
            ActivationFunction::ReLU => z.max(0.0),
            ActivationFunction::Tanh => z.tanh(),
            ActivationFunction::LeakyReLU { alpha } => if z > 0.0 { z } else { alpha * z },
        }
    }

    /// Derivative with respect to the pre-activation `z`.
    pub fn derivative(&self, z: f64) -> f64 {
        match *self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Sigmoid => {
                let s = sigmoid(z);
                s * (1.0 - s)
            }
            ActivationFunction::ReLU => if z > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Tanh => 1.0 - z.tanh().powi(2),
            ActivationFunction::LeakyReLU { alpha } => if z > 0.0 { 1.0 } else { alpha },
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
