// ============================================================
// Layer 4 — Shard Loader
// ============================================================
// Reads the on-disk dataset: any number of training shards and
// exactly one test file, all in safetensors format.
//
// Directory layout:
//   data/corruptmnist/
//     train_0.safetensors   images [N, 28, 28], labels [N]
//     train_1.safetensors
//     ...
//     test.safetensors      images [M, 28, 28], labels [M]
//
// A safetensors file is a small JSON header (name → dtype,
// shape, byte range) followed by the raw little-endian tensor
// bytes. We look up the two named fields, check their shape,
// and convert the bytes to f32 pixels / u8 labels.
//
// Training shards are concatenated in order of their numeric
// suffix (train_2 before train_10), falling back to file name.
//
// Reference: safetensors crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use safetensors::{Dtype, SafeTensors};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::dataset::DigitDataset;
use crate::domain::error::DatasetError;
use crate::domain::sample::{IMAGE_HEIGHT, IMAGE_WIDTH};
use crate::domain::traits::{DatasetSource, DatasetSplits};

pub const TRAIN_SHARD_PREFIX: &str = "train_";
pub const SHARD_EXTENSION:    &str = "safetensors";
pub const TEST_FILE_NAME:     &str = "test.safetensors";

const IMAGES_FIELD: &str = "images";
const LABELS_FIELD: &str = "labels";

/// Reads training shards and the test file from one directory.
#[derive(Debug, Clone)]
pub struct ShardSource {
    dir:          PathBuf,
    train_shards: Vec<PathBuf>,
}

impl ShardSource {
    /// Look for training shards in `dir`.
    ///
    /// Returns None if the directory is missing or holds no
    /// train_*.safetensors file. The test file is not checked
    /// here; its absence is reported by load().
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut train_shards = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
        {
            let path = entry?.path();
            if is_train_shard(&path) {
                train_shards.push(path);
            }
        }

        if train_shards.is_empty() {
            return Ok(None);
        }

        train_shards.sort_by_key(|p| shard_order_key(p));
        Ok(Some(Self { dir: dir.to_path_buf(), train_shards }))
    }

    pub fn train_shards(&self) -> &[PathBuf] {
        &self.train_shards
    }

    pub fn test_path(&self) -> PathBuf {
        self.dir.join(TEST_FILE_NAME)
    }
}

impl DatasetSource for ShardSource {
    fn load(&self) -> Result<DatasetSplits> {
        let mut parts = Vec::with_capacity(self.train_shards.len());
        for path in &self.train_shards {
            let part = read_shard(path)?;
            tracing::debug!("Loaded shard '{}' ({} samples)", path.display(), part.sample_count());
            parts.push(part);
        }
        let train = DigitDataset::concat(parts);

        let test_path = self.test_path();
        if !test_path.is_file() {
            return Err(DatasetError::MissingTestFile {
                dir:  self.dir.clone(),
                path: test_path,
            }
            .into());
        }
        let test = read_shard(&test_path)?;

        tracing::info!(
            "Loaded {} training samples from {} shard(s), {} test samples",
            train.sample_count(),
            self.train_shards.len(),
            test.sample_count()
        );
        Ok(DatasetSplits { train, test })
    }
}

// ─── Shard Parsing ────────────────────────────────────────────────────────────

/// Read one safetensors file holding `images` and `labels`.
pub fn read_shard(path: &Path) -> Result<DigitDataset, DatasetError> {
    let bytes = fs::read(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let tensors = SafeTensors::deserialize(&bytes).map_err(|e| DatasetError::Format {
        path:   path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let images = tensors
        .tensor(IMAGES_FIELD)
        .map_err(|_| DatasetError::MissingField { path: path.to_path_buf(), field: IMAGES_FIELD })?;
    let labels = tensors
        .tensor(LABELS_FIELD)
        .map_err(|_| DatasetError::MissingField { path: path.to_path_buf(), field: LABELS_FIELD })?;

    // images: [N, 28, 28]
    let image_shape = images.shape();
    if image_shape.len() != 3 || image_shape[1] != IMAGE_HEIGHT || image_shape[2] != IMAGE_WIDTH {
        return Err(DatasetError::ImageShape {
            path:  path.to_path_buf(),
            shape: image_shape.to_vec(),
        });
    }

    // labels: [N]
    if labels.shape().len() != 1 {
        return Err(DatasetError::LabelShape {
            path:  path.to_path_buf(),
            shape: labels.shape().to_vec(),
        });
    }

    let pixels = decode_pixels(path, images.dtype(), images.data())?;
    let raw_labels = decode_labels(path, labels.dtype(), labels.data())?;

    // Labels arrive as i64; range-check before narrowing to u8
    if let Some((index, &label)) = raw_labels
        .iter()
        .enumerate()
        .find(|(_, l)| !crate::domain::sample::is_valid_label(**l))
    {
        return Err(DatasetError::LabelOutOfRange { index, label });
    }
    let labels: Vec<u8> = raw_labels.into_iter().map(|l| l as u8).collect();

    // [N, 28, 28] → [N, 1, 28, 28] is a no-op on the flat buffer
    DigitDataset::new(pixels, labels)
}

/// Convert raw little-endian image bytes to f32, no normalisation.
fn decode_pixels(path: &Path, dtype: Dtype, data: &[u8]) -> Result<Vec<f32>, DatasetError> {
    let pixels = match dtype {
        Dtype::U8  => data.iter().map(|&b| b as f32).collect(),
        Dtype::F32 => data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        Dtype::F64 => data
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32)
            .collect(),
        other => {
            return Err(DatasetError::UnsupportedDtype {
                path:  path.to_path_buf(),
                field: IMAGES_FIELD,
                dtype: format!("{other:?}"),
            })
        }
    };
    Ok(pixels)
}

fn decode_labels(path: &Path, dtype: Dtype, data: &[u8]) -> Result<Vec<i64>, DatasetError> {
    let labels = match dtype {
        Dtype::U8  => data.iter().map(|&b| b as i64).collect(),
        Dtype::I32 => data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64)
            .collect(),
        Dtype::I64 => data
            .chunks_exact(8)
            .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect(),
        other => {
            return Err(DatasetError::UnsupportedDtype {
                path:  path.to_path_buf(),
                field: LABELS_FIELD,
                dtype: format!("{other:?}"),
            })
        }
    };
    Ok(labels)
}

// ─── File Name Helpers ────────────────────────────────────────────────────────

fn is_train_shard(path: &Path) -> bool {
    let is_shard_ext = path.extension().and_then(|e| e.to_str()) == Some(SHARD_EXTENSION);
    let has_prefix   = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.starts_with(TRAIN_SHARD_PREFIX));
    path.is_file() && is_shard_ext && has_prefix
}

/// (numeric suffix, file name); shards without a number sort last
fn shard_order_key(path: &Path) -> (u64, String) {
    let stem   = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let number = stem
        .strip_prefix(TRAIN_SHARD_PREFIX)
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or(u64::MAX);
    (number, stem.to_string())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use burn::data::dataset::Dataset;
    use safetensors::tensor::TensorView;
    use std::collections::HashMap;

    /// Write a shard with f32 images [n, 28, 28] filled with `fill`
    /// and i64 labels.
    pub(crate) fn write_shard(path: &Path, fill: f32, labels: &[i64]) {
        let n = labels.len();
        let image_bytes: Vec<u8> = std::iter::repeat(fill)
            .take(n * IMAGE_HEIGHT * IMAGE_WIDTH)
            .flat_map(|p| p.to_le_bytes())
            .collect();
        let label_bytes: Vec<u8> = labels.iter().flat_map(|l| l.to_le_bytes()).collect();

        let images = TensorView::new(Dtype::F32, vec![n, IMAGE_HEIGHT, IMAGE_WIDTH], &image_bytes).unwrap();
        let labels = TensorView::new(Dtype::I64, vec![n], &label_bytes).unwrap();
        write_views(path, vec![(IMAGES_FIELD, images), (LABELS_FIELD, labels)]);
    }

    fn write_views(path: &Path, views: Vec<(&str, TensorView<'_>)>) {
        let bytes = safetensors::serialize(views, &None::<HashMap<String, String>>).unwrap();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_missing_directory_is_not_discovered() {
        let tmp = tempfile::tempdir().unwrap();
        let found = ShardSource::discover(tmp.path().join("nope")).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_directory_without_train_shards_is_not_discovered() {
        let tmp = tempfile::tempdir().unwrap();
        write_shard(&tmp.path().join(TEST_FILE_NAME), 0.0, &[1]);
        fs::write(tmp.path().join("train_notes.txt"), "x").unwrap();
        assert!(ShardSource::discover(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn test_loads_and_concatenates_in_numeric_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_shard(&tmp.path().join("train_10.safetensors"), 10.0, &[9]);
        write_shard(&tmp.path().join("train_2.safetensors"), 2.0, &[2, 3]);
        write_shard(&tmp.path().join(TEST_FILE_NAME), 255.0, &[7, 8, 9]);

        let source = ShardSource::discover(tmp.path()).unwrap().unwrap();
        assert_eq!(source.train_shards().len(), 2);

        let splits = source.load().unwrap();
        assert_eq!(splits.train.len(), 3);
        assert_eq!(splits.train.labels(), &[2, 3, 9]);
        assert_eq!(splits.train.image(0).unwrap()[0], 2.0);
        assert_eq!(splits.train.image(2).unwrap()[0], 10.0);

        // No normalisation beyond dtype conversion
        assert_eq!(splits.test.len(), 3);
        assert_eq!(splits.test.get(0).unwrap().image[100], 255.0);
    }

    #[test]
    fn test_u8_images_are_converted_to_float() {
        let tmp   = tempfile::tempdir().unwrap();
        let path  = tmp.path().join("train_0.safetensors");
        let image = vec![200u8; IMAGE_HEIGHT * IMAGE_WIDTH];
        let label = vec![4u8];
        write_views(&path, vec![
            (IMAGES_FIELD, TensorView::new(Dtype::U8, vec![1, 28, 28], &image).unwrap()),
            (LABELS_FIELD, TensorView::new(Dtype::U8, vec![1], &label).unwrap()),
        ]);

        let ds = read_shard(&path).unwrap();
        assert_eq!(ds.labels(), &[4]);
        assert!(ds.image(0).unwrap().iter().all(|&p| p == 200.0));
    }

    #[test]
    fn test_missing_labels_field_is_fatal() {
        let tmp   = tempfile::tempdir().unwrap();
        let path  = tmp.path().join("train_0.safetensors");
        let image = vec![0u8; IMAGE_HEIGHT * IMAGE_WIDTH];
        write_views(&path, vec![
            (IMAGES_FIELD, TensorView::new(Dtype::U8, vec![1, 28, 28], &image).unwrap()),
        ]);

        let err = read_shard(&path).unwrap_err();
        assert!(matches!(err, DatasetError::MissingField { field: "labels", .. }));
    }

    #[test]
    fn test_count_mismatch_is_fatal() {
        let tmp    = tempfile::tempdir().unwrap();
        let path   = tmp.path().join("train_0.safetensors");
        let image  = vec![0u8; 2 * IMAGE_HEIGHT * IMAGE_WIDTH];
        let labels = vec![1u8, 2, 3];
        write_views(&path, vec![
            (IMAGES_FIELD, TensorView::new(Dtype::U8, vec![2, 28, 28], &image).unwrap()),
            (LABELS_FIELD, TensorView::new(Dtype::U8, vec![3], &labels).unwrap()),
        ]);

        let err = read_shard(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Misaligned { images: 2, labels: 3 }));
    }

    #[test]
    fn test_wrong_image_shape_is_fatal() {
        let tmp    = tempfile::tempdir().unwrap();
        let path   = tmp.path().join("train_0.safetensors");
        let image  = vec![0u8; 784];
        let labels = vec![1u8];
        write_views(&path, vec![
            (IMAGES_FIELD, TensorView::new(Dtype::U8, vec![1, 784], &image).unwrap()),
            (LABELS_FIELD, TensorView::new(Dtype::U8, vec![1], &labels).unwrap()),
        ]);

        let err = read_shard(&path).unwrap_err();
        assert!(matches!(err, DatasetError::ImageShape { .. }));
    }

    #[test]
    fn test_out_of_range_label_is_fatal() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("train_0.safetensors");
        write_shard(&path, 0.0, &[3, 12]);

        let err = read_shard(&path).unwrap_err();
        assert!(matches!(err, DatasetError::LabelOutOfRange { index: 1, label: 12 }));
    }

    #[test]
    fn test_garbage_file_is_a_format_error() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("train_0.safetensors");
        fs::write(&path, b"definitely not safetensors").unwrap();

        let err = read_shard(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Format { .. }));
    }

    #[test]
    fn test_missing_test_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write_shard(&tmp.path().join("train_0.safetensors"), 0.0, &[1]);

        let source = ShardSource::discover(tmp.path()).unwrap().unwrap();
        let err    = source.load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::MissingTestFile { .. })
        ));
    }
}
