use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::model::parameter::Parameter;

/// A parameterized function the training loop can differentiate through.
///
/// `forward` may cache whatever it needs for the following `backward` call.
/// `backward` receives ∂L/∂predictions for the most recent `forward` and must
/// add ∂L/∂p into every reachable parameter's gradient.
///
/// Both parameter accessors return parameters in the same, stable order;
/// optimizers with per-parameter state rely on it.
pub trait Model {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix>;

    fn backward(&mut self, grad_output: &Matrix) -> Result<()>;

    fn parameters(&self) -> Vec<&Parameter>;

    fn parameters_mut(&mut self) -> Vec<&mut Parameter>;

    /// Total number of trainable scalars.
    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(|p| p.len()).sum()
    }
}
