// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The data layer has two ways of producing a dataset: reading
// shard files from disk, or generating random samples. Both
// implement DatasetSource, so the application layer only ever
// calls load() and never cares which one it got.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::data::dataset::DigitDataset;

/// The train and test halves returned by a single load()
#[derive(Debug, Clone)]
pub struct DatasetSplits {
    pub train: DigitDataset,
    pub test:  DigitDataset,
}

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Any component that can produce a train/test pair.
///
/// Implementations:
///   - ShardSource     → reads train_*.safetensors + test.safetensors
///   - SyntheticSource → uniform noise with random labels
///   - DataSource      → whichever of the two was detected at startup
pub trait DatasetSource {
    /// Read (or generate) both splits. Nothing is cached between calls.
    fn load(&self) -> Result<DatasetSplits>;
}
