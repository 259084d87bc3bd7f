use crate::{
    data::dataset::{Batch, BatchSource},
    error::{Error, Result},
    loss::loss_fn::LossFunction,
    model::model::Model,
    optim::optimizer::Optimizer,
    train::diagnostic::Evaluation,
};

/// Runs one update on a single batch and returns its loss.
///
/// Order is fixed: clear gradients, check the batch, forward, loss,
/// backward, optimizer step. Any failure returns before the step, so a
/// rejected batch never changes parameter values.
pub fn train_step<M, L, O>(
    model: &mut M,
    loss_fn: &L,
    optimizer: &mut O,
    batch: &Batch,
) -> Result<f64>
where
    M: Model + ?Sized,
    L: LossFunction + ?Sized,
    O: Optimizer + ?Sized,
{
    optimizer.zero_grad(&mut model.parameters_mut());
    batch.check()?;

    let predictions = model.forward(&batch.inputs)?;
    let loss = loss_fn.evaluate(&predictions, &batch.labels)?;

    let grad = loss_fn.gradient(&predictions, &batch.labels)?;
    predictions.check_same_shape(&grad, "loss gradient")?;
    model.backward(&grad)?;

    optimizer.step(&mut model.parameters_mut())?;
    Ok(loss)
}

/// Mean loss and, for multi-column outputs, argmax accuracy over one full
/// pass. Parameters are not touched; gradients are left as they were.
pub fn evaluate<M, L, D>(
    model: &mut M,
    loss_fn: &L,
    dataset: &mut D,
    batch_size: usize,
) -> Result<Evaluation>
where
    M: Model + ?Sized,
    L: LossFunction + ?Sized,
    D: BatchSource + ?Sized,
{
    if batch_size == 0 {
        return Err(Error::invalid_config("batch_size must be a positive integer"));
    }

    let mut weighted_loss = 0.0;
    let mut seen = 0usize;
    let mut correct = 0usize;
    let mut multi_class = false;

    for batch in dataset.batches(batch_size) {
        batch.check()?;
        let predictions = model.forward(&batch.inputs)?;
        weighted_loss += loss_fn.evaluate(&predictions, &batch.labels)? * batch.len() as f64;
        seen += batch.len();

        if predictions.cols > 1 {
            multi_class = true;
            let targets: Vec<usize> = if batch.labels.cols == 1 {
                batch.labels.as_slice().iter().map(|&c| c as usize).collect()
            } else {
                batch.labels.argmax_rows()
            };
            correct += predictions.argmax_rows().iter()
                .zip(&targets)
                .filter(|(p, t)| p == t)
                .count();
        }
    }

    if seen == 0 {
        return Ok(Evaluation { mean_loss: 0.0, accuracy: None });
    }
    Ok(Evaluation {
        mean_loss: weighted_loss / seen as f64,
        accuracy: multi_class.then(|| correct as f64 / seen as f64),
    })
}
