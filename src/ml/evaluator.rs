// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores a trained classifier on the test split.
//
//   - the model runs on InnerBackend, so no autodiff graph
//   - batches come in dataset order (no shuffling)
//   - every forward pass uses ForwardMode::Infer (no dropout)
//   - accuracy = 100 × argmax hits / samples
//
// Reference: Burn Book §6 (Inference)

use anyhow::Result;
use burn::{data::dataloader::DataLoaderBuilder, prelude::*};

use crate::data::{batcher::DigitBatcher, dataset::DigitDataset};
use crate::domain::error::TrainingError;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Classifier, ClassifierConfig, ForwardMode};
use crate::ml::InnerBackend;

/// Correct predictions out of total samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub total:   usize,
}

impl Accuracy {
    /// 100 × correct / total
    pub fn percent(&self) -> f64 {
        100.0 * self.correct as f64 / self.total as f64
    }
}

/// A classifier held for inference only.
pub struct Evaluator<B: Backend> {
    model:  Classifier<B>,
    device: B::Device,
}

impl<B: Backend> Evaluator<B> {
    /// Build a fresh classifier and install the checkpoint's parameters.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let model = ClassifierConfig::new().init::<B>(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        Ok(Self::from_model(model, device))
    }

    pub fn from_model(model: Classifier<B>, device: B::Device) -> Self {
        Self { model, device }
    }

    /// Argmax predictions over `dataset` in its stored order.
    pub fn evaluate(&self, dataset: DigitDataset, batch_size: usize) -> Result<Accuracy> {
        if batch_size == 0 {
            return Err(TrainingError::ZeroBatchSize.into());
        }
        if dataset.sample_count() == 0 {
            return Err(TrainingError::EmptyTestSet.into());
        }

        let loader = DataLoaderBuilder::new(DigitBatcher::<B>::new(self.device.clone()))
            .batch_size(batch_size)
            .build(dataset);

        let mut correct = 0usize;
        let mut total   = 0usize;

        for batch in loader.iter() {
            total += batch.len();

            let logits = self.model.forward(batch.images, ForwardMode::Infer);
            // argmax(1) returns [batch, 1]; flatten to [batch] before comparing
            let predicted = logits.argmax(1).flatten::<1>(0, 1);

            let hits: i64 = predicted
                .equal(batch.targets)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>();
            correct += hits as usize;
        }

        tracing::debug!("Evaluated {} samples, {} correct", total, correct);
        Ok(Accuracy { correct, total })
    }
}

/// Restore `ckpt_manager`'s checkpoint on the default inference
/// backend and score it on `test_dataset`.
pub fn run_evaluation(
    ckpt_manager: &CheckpointManager,
    test_dataset: DigitDataset,
    batch_size:   usize,
) -> Result<Accuracy> {
    let device    = Default::default();
    let evaluator = Evaluator::<InnerBackend>::from_checkpoint(ckpt_manager, device)?;
    evaluator.evaluate(test_dataset, batch_size)
}
