// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Check the checkpoint path (Layer 6 - infra)
//   Step 2: Pick the data source      (Layer 4 - data)
//   Step 3: Load both splits          (Layer 4 - data)
//   Step 4: Open the metrics CSV      (Layer 6 - infra)
//   Step 5: Run training loop         (Layer 5 - ml)
//   Step 6: Save the run summary      (Layer 6 - infra)
//
// The checkpoint is written by the training loop itself, after
// the last epoch. The run summary (this config plus the loss of
// every epoch) goes next to it as JSON, so `evaluate` can tell
// which synthetic data the checkpoint was trained on.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    source::DataSource,
    synthetic::{SyntheticSource, DEFAULT_SEED, DEFAULT_TEST_SAMPLES, DEFAULT_TRAIN_SAMPLES},
};
use crate::domain::traits::DatasetSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::trainer::{run_training, TrainReport};

pub const DEFAULT_DATA_DIR:   &str = "data/corruptmnist";
pub const DEFAULT_CHECKPOINT: &str = "models/model.mpk";
pub const DEFAULT_BATCH_SIZE: usize = 64;

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a training run needs. The model's own hyperparameters
// are fixed and live in ClassifierConfig.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:        String,
    pub checkpoint:      String,
    pub batch_size:      usize,
    pub epochs:          usize,
    pub lr:              f64,
    pub seed:            u64,
    pub synthetic_train: usize,
    pub synthetic_test:  usize,
    pub metrics:         Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:        DEFAULT_DATA_DIR.to_string(),
            checkpoint:      DEFAULT_CHECKPOINT.to_string(),
            batch_size:      DEFAULT_BATCH_SIZE,
            epochs:          5,
            lr:              1e-3,
            seed:            DEFAULT_SEED,
            synthetic_train: DEFAULT_TRAIN_SAMPLES,
            synthetic_test:  DEFAULT_TEST_SAMPLES,
            metrics:         None,
        }
    }
}

// ─── Run Summary ──────────────────────────────────────────────────────────────
// Written as model.json beside model.mpk after a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub config: TrainConfig,
    pub epochs: Vec<EpochMetrics>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Reject a bad checkpoint path before any work ──────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint)?;

        // ── Step 2: Shards if present, synthetic data otherwise ───────────────
        let fallback = SyntheticSource::new(cfg.synthetic_train, cfg.synthetic_test, cfg.seed);
        let source   = DataSource::detect(&cfg.data_dir, fallback)?;

        // ── Step 3: Read everything before the first step ─────────────────────
        // A malformed shard stops the run here, before any checkpoint exists
        let splits = source
            .load()
            .with_context(|| format!("Failed to load training data from '{}'", cfg.data_dir))?;
        tracing::info!(
            "Loaded {} train / {} test samples",
            splits.train.sample_count(),
            splits.test.sample_count()
        );

        // ── Step 4: Optional per-epoch CSV ────────────────────────────────────
        let metrics = cfg.metrics.as_deref().map(MetricsLogger::new).transpose()?;
        if let Some(logger) = &metrics {
            tracing::info!("Logging epoch metrics to '{}'", logger.csv_path().display());
        }

        // ── Step 5: Train, then save (Layer 5) ────────────────────────────────
        let report = run_training(cfg, splits.train, &ckpt_manager, metrics.as_ref())?;
        if let Some(loss) = report.final_loss() {
            tracing::info!("Final epoch loss {:.6}", loss);
        }

        // ── Step 6: Run summary for evaluate ──────────────────────────────────
        ckpt_manager.save_summary(&RunSummary {
            config: cfg.clone(),
            epochs: report.epochs.clone(),
        })?;

        Ok(report)
    }
}
