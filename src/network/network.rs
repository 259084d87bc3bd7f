use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::layers::dense::Dense;
use crate::math::matrix::Matrix;
use crate::model::{model::Model, parameter::Parameter};
use crate::network::spec::NetworkSpec;

/// A sequential stack of dense layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Dense>,
}

impl Network {
    /// Builds a freshly initialized network. The same `seed` always yields
    /// the same initial weights.
    pub fn from_spec(spec: &NetworkSpec, seed: u64) -> Result<Network> {
        spec.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let layers = spec.layers.iter()
            .enumerate()
            .map(|(i, l)| Dense::new(i, l.input_size, l.size, l.activation, &mut rng))
            .collect();
        Ok(Network { layers })
    }

    pub fn from_layers(layers: Vec<Dense>) -> Network {
        Network { layers }
    }

    /// Serializes weights (not gradients) to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads a network written by `save_json`; gradients start cleared.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Model for Network {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    fn backward(&mut self, grad_output: &Matrix) -> Result<()> {
        let mut grad = grad_output.clone();
        for (i, layer) in self.layers.iter_mut().enumerate().rev() {
            grad = layer.backward(i, &grad)?;
        }
        Ok(())
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.layers.iter()
            .flat_map(|l| [&l.weights, &l.biases])
            .collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.layers.iter_mut()
            .flat_map(|l| [&mut l.weights, &mut l.biases])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::loss::loss_type::LossType;
    use crate::network::spec::LayerSpec;

    fn spec() -> NetworkSpec {
        NetworkSpec {
            name: "tiny".into(),
            layers: vec![
                LayerSpec { size: 3, input_size: 2, activation: ActivationFunction::ReLU },
                LayerSpec { size: 2, input_size: 3, activation: ActivationFunction::Identity },
            ],
            loss: LossType::CrossEntropy,
        }
    }

    #[test]
    fn test_parameters_are_named_in_layer_order() {
        let net = Network::from_spec(&spec(), 1).unwrap();
        let names: Vec<&str> = net.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["layers.0.weight", "layers.0.bias", "layers.1.weight", "layers.1.bias"]
        );
        assert_eq!(net.num_parameters(), 2 * 3 + 3 + 3 * 2 + 2);
    }

    #[test]
    fn test_forward_then_backward_fills_every_gradient() {
        let mut net = Network::from_spec(&spec(), 3).unwrap();
        let x = Matrix::from_rows(&[vec![0.5, -1.0], vec![1.5, 2.0]]).unwrap();
        let out = net.forward(&x).unwrap();
        assert_eq!(out.shape(), (2, 2));

        net.backward(&Matrix::from_vec(2, 2, vec![1.0; 4]).unwrap()).unwrap();
        let last = net.parameters()[3].grad();
        assert_eq!(last.as_slice(), &[2.0, 2.0]);
    }

    #[test]
    fn test_json_roundtrip_keeps_weights() {
        let net = Network::from_spec(&spec(), 11).unwrap();
        let path = std::env::temp_dir().join("ferrite_train_network_roundtrip.json");
        let path = path.to_str().unwrap();
        net.save_json(path).unwrap();
        let loaded = Network::load_json(path).unwrap();
        std::fs::remove_file(path).ok();

        for (a, b) in net.parameters().iter().zip(loaded.parameters()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.value.shape(), b.value.shape());
            for (x, y) in a.value.as_slice().iter().zip(b.value.as_slice()) {
                assert!((x - y).abs() < 1e-12);
            }
            assert!(b.grad().as_slice().iter().all(|&g| g == 0.0));
        }
    }

    #[test]
    fn test_load_rejects_truncated_weights() {
        let json = r#"{"layers":[{
            "weights":{"name":"layers.0.weight","value":{"rows":2,"cols":2,"data":[1.0]}},
            "biases":{"name":"layers.0.bias","value":{"rows":1,"cols":2,"data":[0.0,0.0]}},
            "activation":"identity"
        }]}"#;
        let path = std::env::temp_dir().join("ferrite_train_truncated_network.json");
        let path = path.to_str().unwrap();
        std::fs::write(path, json).unwrap();
        let loaded = Network::load_json(path);
        std::fs::remove_file(path).ok();

        match loaded {
            Err(crate::error::Error::Json(e)) => {
                assert!(e.to_string().contains("expected 4, got 1"), "{e}");
            }
            other => panic!("expected a json error, got {other:?}"),
        }
    }
}
