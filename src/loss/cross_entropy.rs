use crate::error::{Error, Result};
use crate::loss::loss_fn::LossFunction;
use crate::math::matrix::Matrix;

/// Categorical cross-entropy computed directly on logits.
///
/// Labels are either an n×1 column of class indices or an n×k matrix of
/// target distributions (one-hot or soft). The loss is averaged over the
/// batch, and since softmax is folded in, the gradient with respect to the
/// logits is `(softmax(z) - y) / n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// Resolves labels to one target distribution per row.
    fn targets(logits: &Matrix, labels: &Matrix) -> Result<Matrix> {
        if labels.rows != logits.rows {
            return Err(Error::shape("loss label rows", logits.rows, labels.rows));
        }
        if labels.cols == logits.cols {
            return Ok(labels.clone());
        }
        if labels.cols != 1 {
            return Err(Error::shape("loss label columns", logits.cols, labels.cols));
        }
        let k = logits.cols;
        let mut onehot = Matrix::zeros(labels.rows, k);
        for i in 0..labels.rows {
            let raw = labels.get(i, 0);
            if !(raw >= 0.0 && raw.fract() == 0.0 && (raw as usize) < k) {
                return Err(Error::InvalidLabel { row: i, label: raw, classes: k });
            }
            onehot.set(i, raw as usize, 1.0);
        }
        Ok(onehot)
    }
}

/// Numerically stable log-softmax of one row.
fn log_softmax(row: &[f64]) -> Vec<f64> {
    let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let lse = max + row.iter().map(|z| (z - max).exp()).sum::<f64>().ln();
    row.iter().map(|z| z - lse).collect()
}

impl LossFunction for CrossEntropyLoss {
    fn evaluate(&self, predictions: &Matrix, labels: &Matrix) -> Result<f64> {
        let targets = Self::targets(predictions, labels)?;
        if predictions.rows == 0 {
            return Ok(0.0);
        }
        let total: f64 = (0..predictions.rows)
            .map(|i| {
                log_softmax(predictions.row(i)).iter()
                    .zip(targets.row(i))
                    .map(|(lp, y)| -y * lp)
                    .sum::<f64>()
            })
            .sum();
        Ok(total / predictions.rows as f64)
    }

    fn gradient(&self, predictions: &Matrix, labels: &Matrix) -> Result<Matrix> {
        let targets = Self::targets(predictions, labels)?;
        let n = predictions.rows.max(1) as f64;
        let mut grad = Matrix::zeros(predictions.rows, predictions.cols);
        for i in 0..predictions.rows {
            for (j, lp) in log_softmax(predictions.row(i)).into_iter().enumerate() {
                grad.set(i, j, (lp.exp() - targets.get(i, j)) / n);
            }
        }
        Ok(grad)
    }
}
