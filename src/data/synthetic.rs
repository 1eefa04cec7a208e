// ============================================================
// Layer 4 — Synthetic Data Source
// ============================================================
// Stand-in dataset used when no shards are on disk.
//
// Pixels are uniform noise in [0, 1) and labels are uniform in
// [0, 10), so a model trained on it learns nothing useful. It
// only proves that the pipeline runs end to end.
//
// The generator is seeded, so the same seed always yields the
// same two splits.
//
// Reference: rand crate documentation (StdRng, Uniform)

use anyhow::Result;
use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};

use crate::data::dataset::DigitDataset;
use crate::domain::sample::{IMAGE_PIXELS, NUM_CLASSES};
use crate::domain::traits::{DatasetSource, DatasetSplits};

pub const DEFAULT_TRAIN_SAMPLES: usize = 100;
pub const DEFAULT_TEST_SAMPLES:  usize = 10;
pub const DEFAULT_SEED:          u64   = 42;

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    train_samples: usize,
    test_samples:  usize,
    seed:          u64,
}

impl SyntheticSource {
    pub fn new(train_samples: usize, test_samples: usize, seed: u64) -> Self {
        Self { train_samples, test_samples, seed }
    }

    pub fn train_samples(&self) -> usize { self.train_samples }

    pub fn test_samples(&self) -> usize { self.test_samples }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIN_SAMPLES, DEFAULT_TEST_SAMPLES, DEFAULT_SEED)
    }
}

impl DatasetSource for SyntheticSource {
    fn load(&self) -> Result<DatasetSplits> {
        // One RNG for both splits: train first, then test
        let mut rng = StdRng::seed_from_u64(self.seed);
        let train   = random_dataset(&mut rng, self.train_samples)?;
        let test    = random_dataset(&mut rng, self.test_samples)?;

        tracing::debug!(
            "Generated synthetic data: {} train, {} test (seed {})",
            train.sample_count(),
            test.sample_count(),
            self.seed
        );
        Ok(DatasetSplits { train, test })
    }
}

fn random_dataset(rng: &mut StdRng, n: usize) -> Result<DigitDataset> {
    let pixel_dist = Uniform::new(0.0f32, 1.0f32);
    let label_dist = Uniform::new(0u8, NUM_CLASSES as u8);

    let images: Vec<f32> = (0..n * IMAGE_PIXELS).map(|_| rng.sample(pixel_dist)).collect();
    let labels: Vec<u8>  = (0..n).map(|_| rng.sample(label_dist)).collect();

    Ok(DigitDataset::new(images, labels)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::Dataset;

    #[test]
    fn test_default_sizes() {
        let splits = SyntheticSource::default().load().unwrap();
        assert_eq!(splits.train.len(), 100);
        assert_eq!(splits.test.len(), 10);
    }

    #[test]
    fn test_samples_have_digit_shape_and_labels() {
        let splits = SyntheticSource::default().load().unwrap();
        for ds in [&splits.train, &splits.test] {
            for i in 0..ds.len() {
                let s = ds.get(i).unwrap();
                assert_eq!(s.image.len(), 28 * 28);
                assert!(s.label < 10);
                assert!(s.image.iter().all(|p| (0.0..1.0).contains(p)));
            }
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = SyntheticSource::new(5, 2, 7).load().unwrap();
        let b = SyntheticSource::new(5, 2, 7).load().unwrap();
        assert_eq!(a.train.labels(), b.train.labels());
        assert_eq!(a.test.image(1), b.test.image(1));
    }

    #[test]
    fn test_custom_sizes() {
        let splits = SyntheticSource::new(3, 0, 1).load().unwrap();
        assert_eq!(splits.train.len(), 3);
        assert_eq!(splits.test.len(), 0);
    }
}
