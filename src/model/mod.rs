pub mod model;
pub mod parameter;

pub use model::Model;
pub use parameter::Parameter;
