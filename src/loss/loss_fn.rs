use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Maps a batch of predictions and labels to one scalar, and supplies the
/// gradient of that scalar with respect to the predictions.
///
/// Calling `gradient` and handing the result to `Model::backward` is the
/// backward pass; together with `evaluate` this is the whole protocol the
/// training loop relies on.
pub trait LossFunction {
    fn evaluate(&self, predictions: &Matrix, labels: &Matrix) -> Result<f64>;

    fn gradient(&self, predictions: &Matrix, labels: &Matrix) -> Result<Matrix>;
}

impl<L: LossFunction + ?Sized> LossFunction for Box<L> {
    fn evaluate(&self, predictions: &Matrix, labels: &Matrix) -> Result<f64> {
        (**self).evaluate(predictions, labels)
    }

    fn gradient(&self, predictions: &Matrix, labels: &Matrix) -> Result<Matrix> {
        (**self).gradient(predictions, labels)
    }
}

/// Element-wise losses need labels shaped exactly like the predictions.
pub(crate) fn check_same_shape(predictions: &Matrix, labels: &Matrix) -> Result<()> {
    if labels.rows != predictions.rows {
        return Err(Error::shape("loss label rows", predictions.rows, labels.rows));
    }
    if labels.cols != predictions.cols {
        return Err(Error::shape("loss label columns", predictions.cols, labels.cols));
    }
    Ok(())
}

/// Applies `f(p, y)` element-wise and averages over every element.
pub(crate) fn mean_elementwise<F>(predictions: &Matrix, labels: &Matrix, f: F) -> Result<f64>
where
    F: Fn(f64, f64) -> f64,
{
    check_same_shape(predictions, labels)?;
    let n = predictions.as_slice().len();
    if n == 0 {
        return Ok(0.0);
    }
    let total: f64 = predictions.as_slice().iter()
        .zip(labels.as_slice())
        .map(|(&p, &y)| f(p, y))
        .sum();
    Ok(total / n as f64)
}

/// Gradient of `mean_elementwise`: `df(p, y) / n` per element.
pub(crate) fn mean_elementwise_grad<F>(predictions: &Matrix, labels: &Matrix, df: F) -> Result<Matrix>
where
    F: Fn(f64, f64) -> f64,
{
    check_same_shape(predictions, labels)?;
    let n = predictions.as_slice().len().max(1) as f64;
    let data = predictions.as_slice().iter()
        .zip(labels.as_slice())
        .map(|(&p, &y)| df(p, y) / n)
        .collect();
    Matrix::from_vec(predictions.rows, predictions.cols, data)
}
