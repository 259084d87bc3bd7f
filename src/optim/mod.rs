pub mod optimizer;
pub mod sgd;
pub mod momentum;

pub use optimizer::{Optimizer, OptimizerSpec};
pub use sgd::Sgd;
pub use momentum::Momentum;
