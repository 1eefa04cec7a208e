// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, constants, error types and traits that
// define the core concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A labelled digit image and the image geometry constants
pub mod sample;

// Typed errors for dataset, checkpoint and training failures
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
