use crate::error::Result;
use crate::loss::loss_fn::{mean_elementwise, mean_elementwise_grad, LossFunction};
use crate::math::matrix::Matrix;

const EPS: f64 = 1e-12;

/// Binary cross-entropy on probabilities (pair with a Sigmoid output).
#[derive(Debug, Default, Clone, Copy)]
pub struct BceLoss;

impl LossFunction for BceLoss {
    /// -mean(y·ln(p+ε) + (1-y)·ln(1-p+ε))
    fn evaluate(&self, predictions: &Matrix, labels: &Matrix) -> Result<f64> {
        mean_elementwise(predictions, labels, |p, y| {
            -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln())
        })
    }

    fn gradient(&self, predictions: &Matrix, labels: &Matrix) -> Result<Matrix> {
        mean_elementwise_grad(predictions, labels, |p, y| {
            (p - y) / ((p + EPS) * (1.0 - p + EPS))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confident_correct_prediction_is_cheap() {
        let y = Matrix::column(vec![1.0, 0.0]);
        let good = BceLoss.evaluate(&Matrix::column(vec![0.99, 0.01]), &y).unwrap();
        let bad = BceLoss.evaluate(&Matrix::column(vec![0.01, 0.99]), &y).unwrap();
        assert!(good < 0.02);
        assert!(bad > 4.0);
    }

    #[test]
    fn test_gradient_sign_points_toward_label() {
        let grad = BceLoss
            .gradient(&Matrix::column(vec![0.3, 0.8]), &Matrix::column(vec![1.0, 0.0]))
            .unwrap();
        assert!(grad.get(0, 0) < 0.0);
        assert!(grad.get(1, 0) > 0.0);
    }
}
