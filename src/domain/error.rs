// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Typed failures for the three fatal conditions the pipeline
// distinguishes. Everything above this layer wraps them in
// anyhow::Error, but callers (and tests) can still downcast
// to tell a missing checkpoint from a corrupt one.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use std::path::PathBuf;
use thiserror::Error;

/// A dataset shard exists but cannot be used.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read shard '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shard '{path}' is not a valid safetensors file: {reason}")]
    Format { path: PathBuf, reason: String },

    #[error("shard '{path}' has no '{field}' field")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("shard '{path}': field '{field}' has unsupported dtype {dtype}")]
    UnsupportedDtype {
        path:  PathBuf,
        field: &'static str,
        dtype: String,
    },

    #[error("shard '{path}': images have shape {shape:?}, expected [N, 28, 28]")]
    ImageShape { path: PathBuf, shape: Vec<usize> },

    #[error("shard '{path}': labels have shape {shape:?}, expected [N]")]
    LabelShape { path: PathBuf, shape: Vec<usize> },

    #[error("{images} images but {labels} labels")]
    Misaligned { images: usize, labels: usize },

    #[error("label {label} at index {index} is outside [0, 10)")]
    LabelOutOfRange { index: usize, label: i64 },

    #[error("training shards found in '{dir}' but test file '{path}' is missing")]
    MissingTestFile { dir: PathBuf, path: PathBuf },
}

/// Saving or restoring model parameters failed.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint file not found: '{0}'")]
    NotFound(PathBuf),

    #[error("checkpoint path '{0}' must end in .mpk")]
    Extension(PathBuf),

    #[error("cannot load checkpoint '{path}': {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("cannot write checkpoint '{path}': {reason}")]
    Write { path: PathBuf, reason: String },
}

/// The training or evaluation loop cannot run on the given data.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("test set is empty")]
    EmptyTestSet,

    #[error("batch size must be at least 1")]
    ZeroBatchSize,
}
