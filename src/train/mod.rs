pub mod diagnostic;
pub mod train_config;
pub mod run_spec;
pub mod trainer;
pub mod loop_fn;

pub use diagnostic::{Diagnostic, Evaluation};
pub use train_config::TrainConfig;
pub use run_spec::RunSpec;
pub use trainer::{train_step, evaluate};
pub use loop_fn::run;
