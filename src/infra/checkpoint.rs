// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the classifier's parameters with Burn's
// NamedMpkFileRecorder at full (f32) precision.
//
// What gets saved:
//   model.mpk   one MessagePack file mapping each parameter path
//               (conv1.weight, conv1.bias, ..., fc2.bias) to its
//               values. No architecture description: the caller
//               must rebuild the same Classifier before loading.
//   model.json  the run summary (training config and per-epoch
//               loss), written next to the checkpoint.
//
// The recorder appends `.mpk` to whatever it is handed, so the
// manager only accepts paths that already end in `.mpk`. The file
// on disk is then exactly the path the user gave:
//   models/model.mpk  → accepted
//   models/model      → CheckpointError::Extension
//   models/run.1      → CheckpointError::Extension
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::CheckpointError;
use crate::ml::model::Classifier;

type CheckpointRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

pub const CHECKPOINT_EXTENSION: &str = "mpk";
pub const SUMMARY_EXTENSION:    &str = "json";

/// Reads and writes one checkpoint file and its run summary.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    /// Full path, always ending in .mpk
    path: PathBuf,
}

impl CheckpointManager {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let path = path.into();
        if path.extension().and_then(|e| e.to_str()) != Some(CHECKPOINT_EXTENSION) {
            return Err(CheckpointError::Extension(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// The run summary file: same stem, `.json` extension
    pub fn summary_path(&self) -> PathBuf {
        self.path.with_extension(SUMMARY_EXTENSION)
    }

    /// Write all model parameters. Creates parent directories as needed.
    pub fn save_model<B: Backend>(&self, model: &Classifier<B>) -> Result<(), CheckpointError> {
        self.create_parent_dir()?;

        CheckpointRecorder::new()
            .record(model.clone().into_record(), self.path.clone())
            .map_err(|e| CheckpointError::Write {
                path:   self.path.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!("Saved checkpoint '{}'", self.path.display());
        Ok(())
    }

    /// Restore parameters into `model`, which must have the same
    /// architecture as the one that was saved.
    pub fn load_model<B: Backend>(
        &self,
        model:  Classifier<B>,
        device: &B::Device,
    ) -> Result<Classifier<B>, CheckpointError> {
        // A missing file gets its own error, separate from a corrupt one
        if !self.exists() {
            return Err(CheckpointError::NotFound(self.path.clone()));
        }

        let record = CheckpointRecorder::new()
            .load(self.path.clone(), device)
            .map_err(|e| CheckpointError::Malformed {
                path:   self.path.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!("Loaded checkpoint '{}'", self.path.display());
        Ok(model.load_record(record))
    }

    /// Write `summary` as pretty JSON next to the checkpoint.
    pub fn save_summary<T: Serialize>(&self, summary: &T) -> Result<()> {
        self.create_parent_dir()?;
        let path = self.summary_path();

        // serde_json::to_string_pretty adds indentation for readability
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write run summary to '{}'", path.display()))?;

        tracing::debug!("Saved run summary to '{}'", path.display());
        Ok(())
    }

    /// Read the run summary, if training left one.
    pub fn load_summary<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let path = self.summary_path();
        if !path.is_file() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read run summary from '{}'", path.display()))?;
        let summary = serde_json::from_str(&json)
            .with_context(|| format!("Run summary '{}' is not valid JSON", path.display()))?;
        Ok(Some(summary))
    }

    fn create_parent_dir(&self) -> Result<(), CheckpointError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CheckpointError::Write {
                path:   self.path.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::{ClassifierConfig, ForwardMode};
    use burn::backend::NdArray;
    use serde::Deserialize;

    type TestBackend = NdArray;

    #[test]
    fn test_mpk_path_is_kept_exactly() {
        let ckpt = CheckpointManager::new("models/model.mpk").unwrap();
        assert_eq!(ckpt.path(), Path::new("models/model.mpk"));
        assert_eq!(ckpt.summary_path(), Path::new("models/model.json"));
    }

    #[test]
    fn test_other_extensions_are_rejected() {
        for path in ["models/model", "models/model.pth", "models/run.1", "models/run.2"] {
            let err = CheckpointManager::new(path).unwrap_err();
            assert!(matches!(err, CheckpointError::Extension(p) if p == Path::new(path)));
        }
    }

    #[test]
    fn test_distinct_paths_never_share_a_file() {
        let tmp    = tempfile::tempdir().unwrap();
        let first  = CheckpointManager::new(tmp.path().join("run-1.mpk")).unwrap();
        let second = CheckpointManager::new(tmp.path().join("run-2.mpk")).unwrap();
        let device = Default::default();
        let model: Classifier<TestBackend> = ClassifierConfig::new().init(&device);

        first.save_model(&model).unwrap();

        assert!(first.exists());
        assert!(!second.exists());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let tmp    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(tmp.path().join("absent.mpk")).unwrap();
        let device = Default::default();
        let model: Classifier<TestBackend> = ClassifierConfig::new().init(&device);

        let err = ckpt.load_model(model, &device).unwrap_err();
        assert!(matches!(err, CheckpointError::NotFound(p) if p == tmp.path().join("absent.mpk")));
    }

    #[test]
    fn test_corrupt_file_is_malformed() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.mpk");
        fs::write(&path, b"not messagepack").unwrap();

        let ckpt   = CheckpointManager::new(&path).unwrap();
        let device = Default::default();
        let model: Classifier<TestBackend> = ClassifierConfig::new().init(&device);

        let err = ckpt.load_model(model, &device).unwrap_err();
        assert!(matches!(err, CheckpointError::Malformed { .. }));
    }

    #[test]
    fn test_save_creates_parent_dirs_and_round_trips() {
        let tmp    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(tmp.path().join("nested/dir/model.mpk")).unwrap();
        let device = Default::default();
        let saved: Classifier<TestBackend> = ClassifierConfig::new().init(&device);

        ckpt.save_model(&saved).unwrap();
        assert!(tmp.path().join("nested/dir/model.mpk").is_file());

        let fresh: Classifier<TestBackend> = ClassifierConfig::new().init(&device);
        let loaded = ckpt.load_model(fresh, &device).unwrap();

        let input    = Tensor::<TestBackend, 4>::random([3, 1, 28, 28], burn::tensor::Distribution::Default, &device);
        let expected = saved.forward(input.clone(), ForwardMode::Infer).into_data().to_vec::<f32>().unwrap();
        let actual   = loaded.forward(input, ForwardMode::Infer).into_data().to_vec::<f32>().unwrap();
        assert_eq!(expected, actual);
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        seed:  u64,
        label: String,
    }

    #[test]
    fn test_summary_round_trip_and_absence() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(tmp.path().join("out/model.mpk")).unwrap();
        assert_eq!(ckpt.load_summary::<Note>().unwrap(), None);

        let note = Note { seed: 7, label: "x".to_string() };
        ckpt.save_summary(&note).unwrap();
        assert_eq!(ckpt.load_summary::<Note>().unwrap(), Some(note));
    }
}
