use crate::error::Result;
use crate::loss::loss_fn::{mean_elementwise, mean_elementwise_grad, LossFunction};
use crate::math::matrix::Matrix;

/// Mean squared error over every element of the batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct MseLoss;

impl LossFunction for MseLoss {
    /// mean((p - y)²)
    fn evaluate(&self, predictions: &Matrix, labels: &Matrix) -> Result<f64> {
        mean_elementwise(predictions, labels, |p, y| (p - y).powi(2))
    }

    /// 2(p - y) / N
    fn gradient(&self, predictions: &Matrix, labels: &Matrix) -> Result<Matrix> {
        mean_elementwise_grad(predictions, labels, |p, y| 2.0 * (p - y))
    }
}
