use crate::error::Result;
use crate::loss::loss_fn::{mean_elementwise, mean_elementwise_grad, LossFunction};
use crate::math::matrix::Matrix;

const DELTA: f64 = 1.0;

/// Huber loss with δ = 1: quadratic near zero, linear in the tails.
#[derive(Debug, Default, Clone, Copy)]
pub struct HuberLoss;

impl LossFunction for HuberLoss {
    fn evaluate(&self, predictions: &Matrix, labels: &Matrix) -> Result<f64> {
        mean_elementwise(predictions, labels, |p, y| {
            let x = p - y;
            if x.abs() <= DELTA { 0.5 * x * x } else { DELTA * (x.abs() - 0.5 * DELTA) }
        })
    }

    fn gradient(&self, predictions: &Matrix, labels: &Matrix) -> Result<Matrix> {
        mean_elementwise_grad(predictions, labels, |p, y| (p - y).clamp(-DELTA, DELTA))
    }
}
