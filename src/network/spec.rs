use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;

/// One dense layer in a network specification.
///
/// - `size`       — number of units in this layer
/// - `input_size` — width of the previous layer, or the raw feature count for
///                  the first layer
/// - `activation` — applied after the affine transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// Serializable architecture plus the loss it is meant to be trained with.
///
/// Kept separate from trained weights so a configuration can be written to
/// disk before any training happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    /// Ordered input → output.
    pub layers: Vec<LayerSpec>,
    pub loss: LossType,
}

impl NetworkSpec {
    /// Checks that every layer is non-empty and that consecutive layers
    /// agree on their shared width.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::invalid_config(format!("network '{}' has no layers", self.name)));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.size == 0 || layer.input_size == 0 {
                return Err(Error::invalid_config(format!("layer {i} has a zero dimension")));
            }
        }
        for pair in self.layers.windows(2) {
            if pair[1].input_size != pair[0].size {
                return Err(Error::shape("consecutive layer widths", pair[0].size, pair[1].input_size));
            }
        }
        Ok(())
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(second_input: usize) -> NetworkSpec {
        NetworkSpec {
            name: "xor".into(),
            layers: vec![
                LayerSpec { size: 4, input_size: 2, activation: ActivationFunction::Tanh },
                LayerSpec { size: 1, input_size: second_input, activation: ActivationFunction::Sigmoid },
            ],
            loss: LossType::Mse,
        }
    }

    #[test]
    fn test_validate_accepts_chained_widths() {
        let s = spec(4);
        s.validate().unwrap();
        assert_eq!((s.input_size(), s.output_size()), (2, 1));
    }

    #[test]
    fn test_validate_rejects_width_gap() {
        assert!(matches!(
            spec(3).validate(),
            Err(Error::ShapeMismatch { expected: 4, got: 3, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let mut s = spec(4);
        s.layers.clear();
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
    }
}
