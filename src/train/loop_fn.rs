use log::{debug, info, warn};

use crate::data::dataset::BatchSource;
use crate::error::RunError;
use crate::loss::loss_fn::LossFunction;
use crate::model::model::Model;
use crate::optim::optimizer::Optimizer;
use crate::train::diagnostic::Diagnostic;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_step;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` for `config.epochs` passes over `dataset` and returns the
/// diagnostic records in the order they were produced.
///
/// Every batch gets exactly one gradient clear, forward, backward and
/// optimizer step, strictly one batch after another. Each time the global
/// step count reaches a multiple of `config.report_interval` a
/// `Diagnostic { epoch, step, average_loss }` is recorded, where
/// `average_loss` is the running loss divided by `report_interval`. The
/// running loss restarts at zero at the top of each epoch and after every
/// record.
///
/// # Arguments
/// - `model`     — the model to train; its parameters are updated in place
/// - `loss_fn`   — scores predictions and supplies ∂L/∂predictions
/// - `optimizer` — clears gradients and applies the update after each batch
/// - `dataset`   — restarted once per epoch via `batches(batch_size)`
/// - `config`    — `epochs`, `batch_size` and `report_interval`, all ≥ 1
///
/// # Errors
/// Every failure comes back as a `RunError` holding the cause and the
/// records produced before it; those records stay valid.
/// - `InvalidConfig` if any of `epochs`, `batch_size`, `report_interval` is
///   zero; raised before the dataset or model is touched.
/// - `ShapeMismatch` if a batch carries a different number of labels than
///   inputs; the offending batch is never applied.
/// - Any error from the model, loss or optimizer, returned as is. Nothing is
///   retried, the run stops at the first failure.
pub fn run<M, L, O, D>(
    model: &mut M,
    loss_fn: &L,
    optimizer: &mut O,
    dataset: &mut D,
    config: &TrainConfig,
) -> std::result::Result<Vec<Diagnostic>, RunError>
where
    M: Model + ?Sized,
    L: LossFunction + ?Sized,
    O: Optimizer + ?Sized,
    D: BatchSource + ?Sized,
{
    let mut diagnostics = Vec::new();
    if let Err(source) = config.validate() {
        return Err(RunError::new(diagnostics, source));
    }

    info!(
        "training {} parameters: {} epochs, {} examples, batch size {}, lr {}",
        model.num_parameters(),
        config.epochs,
        dataset.len(),
        config.batch_size,
        optimizer.learning_rate(),
    );

    let mut global_step = 0usize;
    for epoch in 1..=config.epochs {
        let mut running_loss = 0.0;
        let mut epoch_step = 0usize;

        // ── One full pass over the dataset ──────────────────────────────────
        for batch in dataset.batches(config.batch_size) {
            let loss = match train_step(model, loss_fn, optimizer, &batch) {
                Ok(loss) => loss,
                Err(source) => {
                    warn!("epoch {epoch} step {}: {source}", global_step + 1);
                    return Err(RunError::new(diagnostics, source));
                }
            };
            running_loss += loss;
            epoch_step += 1;
            global_step += 1;
            debug!("epoch {epoch} step {epoch_step} ({global_step}): batch of {} loss {loss:.6}", batch.len());

            // ── Emit progress ───────────────────────────────────────────────
            if global_step % config.report_interval == 0 {
                let record = Diagnostic {
                    epoch,
                    step: global_step,
                    average_loss: running_loss / config.report_interval as f64,
                };
                info!("[{}, {:5}] loss: {:.4}", record.epoch, record.step, record.average_loss);
                diagnostics.push(record);
                running_loss = 0.0;
            }
        }

        if epoch_step == 0 {
            warn!("epoch {epoch} produced no batches");
        }
    }

    info!("finished {global_step} steps, {} diagnostic records", diagnostics.len());
    Ok(diagnostics)
}
