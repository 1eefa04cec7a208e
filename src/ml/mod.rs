// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model, optimiser and backend code lives here.
//
//   model.rs     — The CNN classifier
//                  conv → relu → pool (×2) → fc → relu
//                  → dropout → fc, plus the cross-entropy loss
//
//   trainer.rs   — The training loop
//                  shuffled batches, forward pass, loss,
//                  backward pass, Adam step, mean epoch loss
//
//   evaluator.rs — The evaluation loop
//                  restores a checkpoint into a fresh model and
//                  counts argmax hits over the test set
//
// Backends:
//   TrainBackend = Autodiff<InnerBackend>  (gradients tracked)
//   InnerBackend = NdArray, or Wgpu with the `wgpu` feature
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// CNN digit classifier
pub mod model;

/// Training loop
pub mod trainer;

/// Checkpoint evaluation on the test set
pub mod evaluator;

#[cfg(not(feature = "wgpu"))]
pub type InnerBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InnerBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InnerBackend>;
