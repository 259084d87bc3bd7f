pub mod dataset;

pub use dataset::{Batch, BatchSource, InMemoryDataset};
