// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores a saved checkpoint on the test split:
//
//   Step 1: Check the checkpoint path (Layer 6 - infra)
//   Step 2: Pick the data source      (Layer 4 - data)
//   Step 3: Load the test split       (Layer 4 - data)
//   Step 4: Restore and evaluate      (Layer 5 / 6)
//
// The synthetic fallback draws its training samples first, so
// with the same seed and train count it reproduces the test set
// a synthetic training run held out. If the run summary saved
// beside the checkpoint says otherwise, a warning is logged.

use anyhow::{Context, Result};

use crate::application::train_use_case::{RunSummary, DEFAULT_BATCH_SIZE, DEFAULT_DATA_DIR};
use crate::data::{
    dataset::DigitDataset,
    source::DataSource,
    synthetic::{SyntheticSource, DEFAULT_SEED, DEFAULT_TEST_SAMPLES, DEFAULT_TRAIN_SAMPLES},
};
use crate::domain::traits::DatasetSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::evaluator::{run_evaluation, Accuracy};

#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub checkpoint:      String,
    pub data_dir:        String,
    pub batch_size:      usize,
    pub seed:            u64,
    pub synthetic_train: usize,
    pub synthetic_test:  usize,
}

impl EvalConfig {
    pub fn new(checkpoint: impl Into<String>) -> Self {
        Self {
            checkpoint:      checkpoint.into(),
            data_dir:        DEFAULT_DATA_DIR.to_string(),
            batch_size:      DEFAULT_BATCH_SIZE,
            seed:            DEFAULT_SEED,
            synthetic_train: DEFAULT_TRAIN_SAMPLES,
            synthetic_test:  DEFAULT_TEST_SAMPLES,
        }
    }

    fn synthetic(&self) -> SyntheticSource {
        SyntheticSource::new(self.synthetic_train, self.synthetic_test, self.seed)
    }
}

pub struct EvaluateUseCase {
    config: EvalConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<Accuracy> {
        let cfg = &self.config;

        // ── Step 1 ────────────────────────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint)?;

        // ── Steps 2 and 3 ─────────────────────────────────────────────────────
        let test = self.load_test_split(&ckpt_manager)?;
        tracing::info!("Evaluating on {} test samples", test.sample_count());

        // ── Step 4 ────────────────────────────────────────────────────────────
        run_evaluation(&ckpt_manager, test, cfg.batch_size)
    }

    fn load_test_split(&self, ckpt_manager: &CheckpointManager) -> Result<DigitDataset> {
        let cfg    = &self.config;
        let source = DataSource::detect(&cfg.data_dir, cfg.synthetic())?;

        if source.is_synthetic() {
            self.warn_on_synthetic_mismatch(ckpt_manager)?;
        }

        let splits = source
            .load()
            .with_context(|| format!("Failed to load test data from '{}'", cfg.data_dir))?;
        Ok(splits.test)
    }

    fn warn_on_synthetic_mismatch(&self, ckpt_manager: &CheckpointManager) -> Result<()> {
        let cfg = &self.config;
        let Some(summary) = ckpt_manager.load_summary::<RunSummary>()? else {
            return Ok(());
        };

        let trained = (summary.config.seed, summary.config.synthetic_train, summary.config.synthetic_test);
        let now     = (cfg.seed, cfg.synthetic_train, cfg.synthetic_test);
        if trained != now {
            tracing::warn!(
                "Checkpoint was trained on synthetic data with seed {}, {} train / {} test samples; \
                 evaluating with seed {}, {} / {}. The test set differs from the one held out",
                trained.0, trained.1, trained.2, now.0, now.1, now.2
            );
        }
        Ok(())
    }
}
