// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch training with Burn's DataLoader and Adam.
//
// Per epoch:
//   - the loader draws a fresh permutation of the training set
//   - each batch: forward (dropout on) → cross-entropy → backward
//     → one Adam step
//   - mean loss = sum of batch losses / number of batches
//
// Gradients are a value returned by loss.backward(); the Adam
// step consumes them together with the per-parameter moment
// state it keeps, and hands back the updated model. Nothing
// carries over into the next batch except that moment state.
//
// Everything is single-threaded: the loader has no workers, and
// the next batch is only built once the previous step returned.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::DigitBatcher, dataset::DigitDataset};
use crate::domain::error::TrainingError;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{Classifier, ClassifierConfig};
use crate::ml::TrainBackend;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epochs:     Vec<EpochMetrics>,
    pub checkpoint: PathBuf,
}

impl TrainReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.epochs.last().map(|m| m.train_loss)
    }
}

/// Seed the backend, build a fresh classifier and train it.
pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: DigitDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       Option<&MetricsLogger>,
) -> Result<TrainReport> {
    let device = Default::default();
    TrainBackend::seed(cfg.seed);

    let model: Classifier<TrainBackend> = ClassifierConfig::new().init(&device);
    tracing::info!("Model ready: {} parameters", model.num_params());

    let (_, report) = train_and_save(cfg, model, train_dataset, ckpt_manager, metrics, &device)?;
    Ok(report)
}

/// Train `model` for cfg.epochs, then write it to the checkpoint.
///
/// Returns the trained model alongside the report. With zero
/// epochs the model is saved exactly as it was passed in.
pub fn train_and_save<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    model:         Classifier<B>,
    train_dataset: DigitDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       Option<&MetricsLogger>,
    device:        &B::Device,
) -> Result<(Classifier<B>, TrainReport)> {
    let (model, epochs) = train_loop(cfg, model, train_dataset, metrics, device)?;

    ckpt_manager.save_model(&model)?;
    tracing::info!("Checkpoint saved to '{}'", ckpt_manager.path().display());

    let report = TrainReport { epochs, checkpoint: ckpt_manager.path().to_path_buf() };
    Ok((model, report))
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    mut model:     Classifier<B>,
    train_dataset: DigitDataset,
    metrics:       Option<&MetricsLogger>,
    device:        &B::Device,
) -> Result<(Classifier<B>, Vec<EpochMetrics>)> {
    if cfg.batch_size == 0 {
        return Err(TrainingError::ZeroBatchSize.into());
    }
    if cfg.epochs > 0 && train_dataset.sample_count() == 0 {
        return Err(TrainingError::EmptyTrainingSet.into());
    }

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new()
        .with_epsilon(1e-8)
        .init::<B, Classifier<B>>();

    // ── Training data loader (reshuffled on every pass) ───────────────────────
    let train_loader = DataLoaderBuilder::new(DigitBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .build(train_dataset);

    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.images, batch.targets);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            // Backward pass + Adam update
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let mean_loss = loss_sum / batches as f64;
        println!("Epoch {}, Loss: {}", epoch, mean_loss);
        tracing::debug!("Epoch {}/{}: {} batches, mean loss {:.6}", epoch, cfg.epochs, batches, mean_loss);

        let m = EpochMetrics::new(epoch, mean_loss, batches);
        if let Some(logger) = metrics {
            logger.log(&m)?;
        }
        history.push(m);
    }

    Ok((model, history))
}
