// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal:
// training a classifier, or scoring a saved one.
//
// Rules for this layer:
//   - No model math or tensor code here (that's Layer 5)
//   - No printing of result lines here (that's Layer 1)
//   - No file formats here (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The checkpoint evaluation workflow
pub mod evaluate_use_case;
