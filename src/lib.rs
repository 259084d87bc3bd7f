pub mod error;
pub mod math;
pub mod activation;
pub mod model;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result, RunError};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use model::{Model, Parameter};
pub use layers::dense::Dense;
pub use network::{Network, NetworkSpec, LayerSpec};
pub use loss::{LossFunction, LossType, MseLoss, CrossEntropyLoss};
pub use optim::{Optimizer, OptimizerSpec, Sgd, Momentum};
pub use data::{Batch, BatchSource, InMemoryDataset};
pub use train::{run, train_step, evaluate, Diagnostic, Evaluation, TrainConfig, RunSpec};
