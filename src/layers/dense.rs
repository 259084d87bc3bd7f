use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::model::parameter::Parameter;

/// Fully connected layer: `a = act(x · W + b)`.
///
/// `W` is stored input × output so a batch (rows = examples) multiplies
/// straight through. The last input and pre-activation are cached by
/// `forward` for the next `backward`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub weights: Parameter,
    pub biases: Parameter,
    pub activation: ActivationFunction,
    #[serde(skip)]
    cache: Option<ForwardCache>,
}

#[derive(Debug, Clone)]
struct ForwardCache {
    input: Matrix,
    pre_activation: Matrix,
}

impl Dense {
    /// Creates a layer named `layers.{index}`. ReLU-family layers use He
    /// initialization, everything else Xavier; biases start at zero.
    pub fn new(
        index: usize,
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        rng: &mut impl Rng,
    ) -> Dense {
        let weights = match activation {
            ActivationFunction::ReLU | ActivationFunction::LeakyReLU { .. } => {
                Matrix::he(input_size, size, rng)
            }
            _ => Matrix::xavier(input_size, size, rng),
        };
        Dense::from_parts(index, weights, Matrix::zeros(1, size), activation)
    }

    /// Builds a layer from explicit weights (input × output) and a 1×output
    /// bias row.
    pub fn from_parts(
        index: usize,
        weights: Matrix,
        biases: Matrix,
        activation: ActivationFunction,
    ) -> Dense {
        Dense {
            weights: Parameter::new(format!("layers.{index}.weight"), weights),
            biases: Parameter::new(format!("layers.{index}.bias"), biases),
            activation,
            cache: None,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.value.rows
    }

    pub fn size(&self) -> usize {
        self.weights.value.cols
    }

    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        if input.cols != self.input_size() {
            return Err(Error::shape("dense layer input width", self.input_size(), input.cols));
        }
        let z = input
            .matmul(&self.weights.value)?
            .add_row_broadcast(&self.biases.value)?;
        let act = self.activation;
        let a = z.map(|x| act.function(x));
        self.cache = Some(ForwardCache { input: input.clone(), pre_activation: z });
        Ok(a)
    }

    /// Takes ∂L/∂a, accumulates ∂L/∂W and ∂L/∂b, and returns ∂L/∂x.
    pub fn backward(&mut self, index: usize, grad_output: &Matrix) -> Result<Matrix> {
        let cache = self.cache.as_ref().ok_or(Error::BackwardBeforeForward { layer: index })?;
        let act = self.activation;
        let act_derivative = cache.pre_activation.map(|z| act.derivative(z));
        // δ = ∂L/∂a ⊙ σ'(z)
        let delta = grad_output.hadamard(&act_derivative)?;

        let weights_grad = cache.input.transpose().matmul(&delta)?;
        let biases_grad = delta.sum_rows();
        let input_grad = delta.matmul(&self.weights.value.transpose())?;

        self.weights.accumulate_grad(&weights_grad)?;
        self.biases.accumulate_grad(&biases_grad)?;
        Ok(input_grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> Dense {
        let w = Matrix::from_rows(&[vec![0.5, -0.2], vec![0.1, 0.3], vec![-0.4, 0.2]]).unwrap();
        let b = Matrix::from_rows(&[vec![0.05, -0.1]]).unwrap();
        Dense::from_parts(0, w, b, ActivationFunction::Tanh)
    }

    fn input() -> Matrix {
        Matrix::from_rows(&[vec![1.0, 2.0, -1.0], vec![0.5, -0.5, 0.25]]).unwrap()
    }

    /// Scalar objective: sum of all outputs.
    fn objective(layer: &mut Dense, x: &Matrix) -> f64 {
        layer.forward(x).unwrap().sum()
    }

    #[test]
    fn test_forward_shape() {
        let mut l = layer();
        let out = l.forward(&input()).unwrap();
        assert_eq!(out.shape(), (2, 2));
        assert!(l.forward(&Matrix::zeros(2, 4)).is_err());
    }

    #[test]
    fn test_backward_before_forward_fails() {
        let mut l = layer();
        let err = l.backward(3, &Matrix::zeros(2, 2)).unwrap_err();
        assert!(matches!(err, Error::BackwardBeforeForward { layer: 3 }));
    }

    #[test]
    fn test_weight_gradient_matches_finite_differences() {
        let x = input();
        let mut l = layer();
        l.forward(&x).unwrap();
        l.backward(0, &Matrix::from_vec(2, 2, vec![1.0; 4]).unwrap()).unwrap();
        let analytic = l.weights.grad();

        let h = 1e-6;
        for r in 0..3 {
            for c in 0..2 {
                let mut plus = layer();
                let v = plus.weights.value.get(r, c);
                plus.weights.value.set(r, c, v + h);
                let mut minus = layer();
                minus.weights.value.set(r, c, v - h);
                let numeric = (objective(&mut plus, &x) - objective(&mut minus, &x)) / (2.0 * h);
                assert!((numeric - analytic.get(r, c)).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_bias_gradient_is_column_sum_of_delta() {
        let w = Matrix::from_rows(&[vec![1.0], vec![1.0]]).unwrap();
        let mut l = Dense::from_parts(1, w, Matrix::zeros(1, 1), ActivationFunction::Identity);
        l.forward(&Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap()).unwrap();
        let grad_in = l.backward(1, &Matrix::column(vec![0.5, 1.5])).unwrap();

        assert_eq!(l.biases.grad().as_slice(), &[2.0]);
        assert_eq!(l.weights.grad().as_slice(), &[5.0, 7.0]);
        assert_eq!(grad_in.row(1), &[1.5, 1.5]);
        assert_eq!(l.weights.name, "layers.1.weight");
    }
}
