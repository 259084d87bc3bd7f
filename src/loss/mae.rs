use crate::error::Result;
use crate::loss::loss_fn::{mean_elementwise, mean_elementwise_grad, LossFunction};
use crate::math::matrix::Matrix;

/// Mean absolute error.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaeLoss;

impl LossFunction for MaeLoss {
    fn evaluate(&self, predictions: &Matrix, labels: &Matrix) -> Result<f64> {
        mean_elementwise(predictions, labels, |p, y| (p - y).abs())
    }

    /// Subgradient sign(p - y) / N, zero where p == y.
    fn gradient(&self, predictions: &Matrix, labels: &Matrix) -> Result<Matrix> {
        mean_elementwise_grad(predictions, labels, |p, y| {
            let diff = p - y;
            if diff > 0.0 { 1.0 } else if diff < 0.0 { -1.0 } else { 0.0 }
        })
    }
}
