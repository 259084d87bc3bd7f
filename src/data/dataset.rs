use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// One mini-batch: `inputs` is batch × features, `labels` has one row per
/// example.
///
/// Construction does not check that the two agree; the training loop does,
/// so that sources assembling batches themselves are held to the same rule.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: Matrix,
    pub labels: Matrix,
}

impl Batch {
    pub fn new(inputs: Matrix, labels: Matrix) -> Batch {
        Batch { inputs, labels }
    }

    pub fn len(&self) -> usize {
        self.inputs.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails unless there is exactly one label row per input row.
    pub fn check(&self) -> Result<()> {
        if self.labels.rows != self.inputs.rows {
            return Err(Error::shape("batch labels", self.inputs.rows, self.labels.rows));
        }
        Ok(())
    }
}

/// A finite, restartable source of mini-batches.
///
/// Every call to `batches` starts a fresh pass over the whole dataset.
/// Batches hold `batch_size` examples except possibly the last one.
pub trait BatchSource {
    /// Total number of examples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn batches(&mut self, batch_size: usize) -> Box<dyn Iterator<Item = Batch> + '_>;
}

/// Examples held in memory, optionally reshuffled at the start of every pass.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    inputs: Matrix,
    labels: Matrix,
    rng: Option<StdRng>,
}

impl InMemoryDataset {
    pub fn new(inputs: Matrix, labels: Matrix) -> Result<InMemoryDataset> {
        if inputs.rows != labels.rows {
            return Err(Error::shape("dataset labels", inputs.rows, labels.rows));
        }
        Ok(InMemoryDataset { inputs, labels, rng: None })
    }

    /// Builds from per-example rows, the layout most loaders produce.
    pub fn from_rows(inputs: &[Vec<f64>], labels: &[Vec<f64>]) -> Result<InMemoryDataset> {
        InMemoryDataset::new(Matrix::from_rows(inputs)?, Matrix::from_rows(labels)?)
    }

    /// Reshuffles before each pass. The same seed reproduces the same
    /// sequence of epoch orders.
    pub fn with_shuffle(mut self, seed: u64) -> InMemoryDataset {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    pub fn shuffles(&self) -> bool {
        self.rng.is_some()
    }

    pub fn feature_dim(&self) -> usize {
        self.inputs.cols
    }

    pub fn inputs(&self) -> &Matrix {
        &self.inputs
    }

    pub fn labels(&self) -> &Matrix {
        &self.labels
    }
}

impl BatchSource for InMemoryDataset {
    fn len(&self) -> usize {
        self.inputs.rows
    }

    fn batches(&mut self, batch_size: usize) -> Box<dyn Iterator<Item = Batch> + '_> {
        let mut order: Vec<usize> = (0..self.inputs.rows).collect();
        if let Some(rng) = self.rng.as_mut() {
            order.shuffle(rng);
        }
        let inputs = &self.inputs;
        let labels = &self.labels;
        let size = batch_size.max(1);
        let batches = (0..order.len()).step_by(size).map(move |start| {
            let end = (start + size).min(order.len());
            let idx = &order[start..end];
            Batch::new(inputs.select_rows(idx), labels.select_rows(idx))
        });
        Box::new(batches)
    }
}
