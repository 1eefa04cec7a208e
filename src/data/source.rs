// ============================================================
// Layer 4 — Data Source Selection
// ============================================================
// Decides once, at startup, where the data comes from:
//
//   data dir has train_*.safetensors ──► DataSource::Shards
//   otherwise                         ──► DataSource::Synthetic
//
// The warning for the synthetic case is emitted here, at
// selection time, and never again.

use anyhow::Result;
use std::path::Path;

use crate::data::loader::ShardSource;
use crate::data::synthetic::SyntheticSource;
use crate::domain::traits::{DatasetSource, DatasetSplits};

#[derive(Debug, Clone)]
pub enum DataSource {
    Shards(ShardSource),
    Synthetic(SyntheticSource),
}

impl DataSource {
    /// Probe `dir` for training shards; fall back to `synthetic`.
    pub fn detect(dir: impl AsRef<Path>, synthetic: SyntheticSource) -> Result<Self> {
        let dir = dir.as_ref();
        match ShardSource::discover(dir)? {
            Some(shards) => {
                tracing::info!(
                    "Found {} training shard(s) in '{}'",
                    shards.train_shards().len(),
                    dir.display()
                );
                Ok(Self::Shards(shards))
            }
            None => {
                tracing::warn!(
                    "Data not found in '{}'. Using synthetic data ({} train / {} test samples) for local debugging",
                    dir.display(),
                    synthetic.train_samples(),
                    synthetic.test_samples()
                );
                Ok(Self::Synthetic(synthetic))
            }
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }
}

impl DatasetSource for DataSource {
    fn load(&self) -> Result<DatasetSplits> {
        match self {
            Self::Shards(s)    => s.load(),
            Self::Synthetic(s) => s.load(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::write_shard;
    use crate::data::loader::TEST_FILE_NAME;
    use burn::data::dataset::Dataset;

    #[test]
    fn test_absent_directory_falls_back_to_synthetic() {
        let tmp    = tempfile::tempdir().unwrap();
        let source = DataSource::detect(tmp.path().join("missing"), SyntheticSource::default()).unwrap();
        assert!(source.is_synthetic());

        let splits = source.load().unwrap();
        assert_eq!(splits.train.len(), 100);
        assert_eq!(splits.test.len(), 10);
        assert!(splits.train.labels().iter().all(|&l| l < 10));
        assert!(splits.test.labels().iter().all(|&l| l < 10));
    }

    #[test]
    fn test_empty_directory_falls_back_to_synthetic() {
        let tmp = tempfile::tempdir().unwrap();
        let source = DataSource::detect(tmp.path(), SyntheticSource::default()).unwrap();
        assert!(source.is_synthetic());
    }

    #[test]
    fn test_shards_are_preferred_when_present() {
        let tmp = tempfile::tempdir().unwrap();
        write_shard(&tmp.path().join("train_0.safetensors"), 1.0, &[1, 2, 3, 4]);
        write_shard(&tmp.path().join(TEST_FILE_NAME), 1.0, &[5, 6]);

        let source = DataSource::detect(tmp.path(), SyntheticSource::default()).unwrap();
        assert!(!source.is_synthetic());

        let splits = source.load().unwrap();
        assert_eq!(splits.train.len(), 4);
        assert_eq!(splits.test.len(), 2);
    }

    #[test]
    fn test_every_load_rereads() {
        let tmp = tempfile::tempdir().unwrap();
        write_shard(&tmp.path().join("train_0.safetensors"), 1.0, &[1]);
        write_shard(&tmp.path().join(TEST_FILE_NAME), 1.0, &[5]);
        let source = DataSource::detect(tmp.path(), SyntheticSource::default()).unwrap();
        assert_eq!(source.load().unwrap().test.len(), 1);

        write_shard(&tmp.path().join(TEST_FILE_NAME), 1.0, &[5, 6, 7]);
        assert_eq!(source.load().unwrap().test.len(), 3);
    }
}
