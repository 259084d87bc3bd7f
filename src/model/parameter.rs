use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::math::matrix::Matrix;

/// A named, trainable matrix together with its accumulated gradient.
///
/// The gradient always has the same shape as the value. It keeps growing
/// across `accumulate_grad` calls until `zero_grad` clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: Matrix,
    #[serde(skip)]
    grad: Option<Matrix>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: Matrix) -> Parameter {
        let grad = Matrix::zeros(value.rows, value.cols);
        Parameter { name: name.into(), value, grad: Some(grad) }
    }

    /// Current gradient; all zeros if nothing has been accumulated yet.
    pub fn grad(&self) -> Matrix {
        match &self.grad {
            Some(g) => g.clone(),
            None => Matrix::zeros(self.value.rows, self.value.cols),
        }
    }

    /// Zeroes the gradient in place, keeping its allocation.
    pub fn zero_grad(&mut self) {
        let (rows, cols) = self.value.shape();
        match &mut self.grad {
            Some(g) => g.fill(0.0),
            None => self.grad = Some(Matrix::zeros(rows, cols)),
        }
    }

    /// Adds `delta` to the gradient.
    pub fn accumulate_grad(&mut self, delta: &Matrix) -> Result<()> {
        self.value.check_same_shape(delta, "parameter gradient")?;
        let (rows, cols) = self.value.shape();
        let grad = self.grad.get_or_insert_with(|| Matrix::zeros(rows, cols));
        for (g, d) in grad.as_mut_slice().iter_mut().zip(delta.as_slice()) {
            *g += d;
        }
        Ok(())
    }

    /// Borrows value and gradient together, for optimizers.
    pub fn value_and_grad_mut(&mut self) -> (&mut Matrix, &Matrix) {
        let (rows, cols) = self.value.shape();
        let grad = self.grad.get_or_insert_with(|| Matrix::zeros(rows, cols));
        (&mut self.value, grad)
    }

    pub fn len(&self) -> usize {
        self.value.rows * self.value.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn param() -> Parameter {
        Parameter::new("w", Matrix::from_rows(&[vec![1.0, 2.0]]).unwrap())
    }

    #[test]
    fn test_accumulates_until_cleared() {
        let mut p = param();
        let delta = Matrix::from_rows(&[vec![0.5, -1.0]]).unwrap();
        p.accumulate_grad(&delta).unwrap();
        p.accumulate_grad(&delta).unwrap();
        assert_eq!(p.grad().as_slice(), &[1.0, -2.0]);

        p.zero_grad();
        assert_eq!(p.grad().as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn test_zero_grad_twice_stays_zero() {
        let mut p = param();
        p.accumulate_grad(&Matrix::from_rows(&[vec![3.0, 3.0]]).unwrap()).unwrap();
        p.zero_grad();
        assert!(p.grad().as_slice().iter().all(|&g| g == 0.0));
        p.zero_grad();
        assert!(p.grad().as_slice().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let mut p = param();
        let err = p.accumulate_grad(&Matrix::zeros(1, 3)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 2, got: 3, .. }));
    }
}
