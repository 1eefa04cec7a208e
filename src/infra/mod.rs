// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-backed concerns used by the training and evaluation
// workflows:
//
//   checkpoint.rs — Saving and loading model parameters
//                   (one full-precision MessagePack file) and
//                   the JSON run summary beside it.
//
//   metrics.rs    — Per-epoch training loss, appended to a
//                   CSV file when --metrics is given.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
