use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::model::parameter::Parameter;
use crate::optim::{momentum::Momentum, sgd::Sgd};

/// An update rule over a model's parameters.
///
/// The optimizer never owns parameters: the model lends them for the
/// duration of each call, always in the model's stable order.
pub trait Optimizer {
    fn learning_rate(&self) -> f64;

    /// Clears every gradient in place.
    fn zero_grad(&self, params: &mut [&mut Parameter]) {
        for p in params.iter_mut() {
            p.zero_grad();
        }
    }

    /// Applies one update using the gradients currently stored on `params`.
    fn step(&mut self, params: &mut [&mut Parameter]) -> Result<()>;
}

impl<O: Optimizer + ?Sized> Optimizer for Box<O> {
    fn learning_rate(&self) -> f64 {
        (**self).learning_rate()
    }

    fn zero_grad(&self, params: &mut [&mut Parameter]) {
        (**self).zero_grad(params)
    }

    fn step(&mut self, params: &mut [&mut Parameter]) -> Result<()> {
        (**self).step(params)
    }
}

/// Serializable optimizer choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerSpec {
    Sgd { learning_rate: f64 },
    Momentum { learning_rate: f64, momentum: f64 },
}

impl OptimizerSpec {
    pub fn build(self) -> Result<Box<dyn Optimizer>> {
        Ok(match self {
            OptimizerSpec::Sgd { learning_rate } => Box::new(Sgd::new(learning_rate)?),
            OptimizerSpec::Momentum { learning_rate, momentum } => {
                Box::new(Momentum::new(learning_rate, momentum)?)
            }
        })
    }
}

pub(crate) fn check_learning_rate(learning_rate: f64) -> Result<()> {
    if !learning_rate.is_finite() || learning_rate < 0.0 {
        return Err(Error::invalid_config(format!(
            "learning rate must be a finite non-negative number, got {learning_rate}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_from_json() {
        let spec: OptimizerSpec =
            serde_json::from_str(r#"{"kind":"momentum","learning_rate":0.1,"momentum":0.9}"#)
                .unwrap();
        assert_eq!(spec, OptimizerSpec::Momentum { learning_rate: 0.1, momentum: 0.9 });
        assert_eq!(spec.build().unwrap().learning_rate(), 0.1);
    }

    #[test]
    fn test_negative_learning_rate_is_rejected() {
        let err = OptimizerSpec::Sgd { learning_rate: -0.5 }.build().err().unwrap();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
