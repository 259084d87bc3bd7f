use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::model::parameter::Parameter;
use crate::optim::optimizer::{check_learning_rate, Optimizer};

/// SGD with classical momentum:
///   v ← μ·v + g
///   p ← p − lr·v
///
/// One velocity buffer per parameter, matched by position, created on the
/// first `step`.
#[derive(Debug, Clone)]
pub struct Momentum {
    learning_rate: f64,
    momentum: f64,
    velocities: Vec<Matrix>,
}

impl Momentum {
    pub fn new(learning_rate: f64, momentum: f64) -> Result<Momentum> {
        check_learning_rate(learning_rate)?;
        if !(0.0..1.0).contains(&momentum) {
            return Err(Error::invalid_config(format!(
                "momentum must be in [0, 1), got {momentum}"
            )));
        }
        Ok(Momentum { learning_rate, momentum, velocities: Vec::new() })
    }
}

impl Optimizer for Momentum {
    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn step(&mut self, params: &mut [&mut Parameter]) -> Result<()> {
        if self.velocities.is_empty() {
            self.velocities = params.iter()
                .map(|p| Matrix::zeros(p.value.rows, p.value.cols))
                .collect();
        }
        if self.velocities.len() != params.len() {
            return Err(Error::shape("momentum buffers", self.velocities.len(), params.len()));
        }

        let (lr, mu) = (self.learning_rate, self.momentum);
        for (p, v) in params.iter_mut().zip(&mut self.velocities) {
            v.check_same_shape(&p.value, "momentum buffer")?;
            let (value, grad) = p.value_and_grad_mut();
            for (vi, g) in v.as_mut_slice().iter_mut().zip(grad.as_slice()) {
                *vi = mu * *vi + g;
            }
            // lr = 0 leaves every value bit-identical.
            if lr != 0.0 {
                for (w, vi) in value.as_mut_slice().iter_mut().zip(v.as_slice()) {
                    *w -= lr * vi;
                }
            }
        }
        Ok(())
    }
}
