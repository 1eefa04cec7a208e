// ============================================================
// Layer 4 — Digit Dataset
// ============================================================
// Implements Burn's Dataset trait over index-aligned images and
// labels, so the DataLoader can call .get(index) and .len().
//
// Reference: Burn Book §4 (Datasets)

use std::sync::Arc;

use burn::data::dataset::Dataset;

use crate::domain::error::DatasetError;
use crate::domain::sample::{is_valid_label, DigitSample, IMAGE_PIXELS};

/// Immutable, index-aligned images and labels.
///
/// Pixel storage is one flat buffer of `len * IMAGE_PIXELS` floats
/// behind an Arc, so cloning a dataset (the data loader needs an
/// owned copy) does not copy the pixels.
#[derive(Debug, Clone)]
pub struct DigitDataset {
    images: Arc<Vec<f32>>,
    labels: Arc<Vec<u8>>,
}

impl DigitDataset {
    /// Build a dataset from a flat pixel buffer and one label per image.
    pub fn new(images: Vec<f32>, labels: Vec<u8>) -> Result<Self, DatasetError> {
        if images.len() % IMAGE_PIXELS != 0 || images.len() / IMAGE_PIXELS != labels.len() {
            return Err(DatasetError::Misaligned {
                images: images.len() / IMAGE_PIXELS,
                labels: labels.len(),
            });
        }
        if let Some((index, &label)) = labels
            .iter()
            .enumerate()
            .find(|(_, l)| !is_valid_label(**l as i64))
        {
            return Err(DatasetError::LabelOutOfRange { index, label: label as i64 });
        }
        Ok(Self { images: Arc::new(images), labels: Arc::new(labels) })
    }

    /// Join several datasets end to end, keeping their order.
    pub fn concat(parts: Vec<DigitDataset>) -> Self {
        let mut images = Vec::with_capacity(parts.iter().map(|p| p.images.len()).sum());
        let mut labels = Vec::with_capacity(parts.iter().map(|p| p.labels.len()).sum());
        for part in &parts {
            images.extend_from_slice(&part.images);
            labels.extend_from_slice(&part.labels);
        }
        Self { images: Arc::new(images), labels: Arc::new(labels) }
    }

    pub fn sample_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// The IMAGE_PIXELS floats of image `index`
    pub fn image(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(IMAGE_PIXELS)?;
        self.images.get(start..start + IMAGE_PIXELS)
    }
}

impl Dataset<DigitSample> for DigitDataset {
    fn get(&self, index: usize) -> Option<DigitSample> {
        let image = self.image(index)?.to_vec();
        let label = *self.labels().get(index)?;
        Some(DigitSample::new(image, label))
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_of(n: usize) -> DigitDataset {
        let images = (0..n).flat_map(|i| vec![i as f32; IMAGE_PIXELS]).collect();
        let labels = (0..n).map(|i| (i % 10) as u8).collect();
        DigitDataset::new(images, labels).unwrap()
    }

    #[test]
    fn test_get_returns_aligned_pairs() {
        let ds = dataset_of(3);
        let s  = ds.get(2).unwrap();
        assert_eq!(s.label, 2);
        assert_eq!(s.image.len(), IMAGE_PIXELS);
        assert!(s.image.iter().all(|&p| p == 2.0));
        assert!(ds.get(3).is_none());
    }

    #[test]
    fn test_misaligned_counts_are_rejected() {
        let err = DigitDataset::new(vec![0.0; IMAGE_PIXELS * 2], vec![1]).unwrap_err();
        assert!(matches!(err, DatasetError::Misaligned { images: 2, labels: 1 }));
    }

    #[test]
    fn test_partial_image_is_rejected() {
        let err = DigitDataset::new(vec![0.0; IMAGE_PIXELS + 3], vec![1]).unwrap_err();
        assert!(matches!(err, DatasetError::Misaligned { .. }));
    }

    #[test]
    fn test_label_out_of_range_is_rejected() {
        let err = DigitDataset::new(vec![0.0; IMAGE_PIXELS * 2], vec![3, 10]).unwrap_err();
        assert!(matches!(err, DatasetError::LabelOutOfRange { index: 1, label: 10 }));
    }

    #[test]
    fn test_concat_keeps_order() {
        let joined = DigitDataset::concat(vec![dataset_of(2), dataset_of(3)]);
        assert_eq!(joined.len(), 5);
        assert_eq!(joined.labels(), &[0, 1, 0, 1, 2]);
        assert_eq!(joined.image(4).unwrap()[0], 2.0);
    }
}
