use crate::error::Result;
use crate::model::parameter::Parameter;
use crate::optim::optimizer::{check_learning_rate, Optimizer};

/// Plain stochastic gradient descent: `p ← p − lr · g`.
#[derive(Debug, Clone)]
pub struct Sgd {
    learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Result<Sgd> {
        check_learning_rate(learning_rate)?;
        Ok(Sgd { learning_rate })
    }
}

impl Optimizer for Sgd {
    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn step(&mut self, params: &mut [&mut Parameter]) -> Result<()> {
        // lr = 0 leaves every value bit-identical, whatever the gradient holds.
        if self.learning_rate == 0.0 {
            return Ok(());
        }
        let lr = self.learning_rate;
        for p in params.iter_mut() {
            let (value, grad) = p.value_and_grad_mut();
            for (w, g) in value.as_mut_slice().iter_mut().zip(grad.as_slice()) {
                *w -= lr * g;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;

    fn param(values: Vec<f64>, grad: Vec<f64>) -> Parameter {
        let n = values.len();
        let mut p = Parameter::new("p", Matrix::from_vec(1, n, values).unwrap());
        p.accumulate_grad(&Matrix::from_vec(1, n, grad).unwrap()).unwrap();
        p
    }

    #[test]
    fn test_step_moves_against_gradient() {
        let mut p = param(vec![1.0, -1.0], vec![2.0, -4.0]);
        let mut sgd = Sgd::new(0.5).unwrap();
        sgd.step(&mut [&mut p]).unwrap();
        assert_eq!(p.value.as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_zero_learning_rate_is_bit_identical() {
        let before = vec![-0.0, 1.5e-300, f64::MAX, 3.25];
        let mut p = param(before.clone(), vec![f64::INFINITY, f64::NAN, -7.0, 1e308]);
        let mut sgd = Sgd::new(0.0).unwrap();
        sgd.step(&mut [&mut p]).unwrap();
        let after: Vec<u64> = p.value.as_slice().iter().map(|x| x.to_bits()).collect();
        let expected: Vec<u64> = before.iter().map(|x| x.to_bits()).collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_zero_grad_clears_all_params() {
        let mut a = param(vec![1.0], vec![3.0]);
        let mut b = param(vec![2.0, 2.0], vec![1.0, 1.0]);
        let sgd = Sgd::new(0.1).unwrap();
        sgd.zero_grad(&mut [&mut a, &mut b]);
        sgd.zero_grad(&mut [&mut a, &mut b]);
        assert!(a.grad().as_slice().iter().chain(b.grad().as_slice()).all(|&g| g == 0.0));
    }
}
