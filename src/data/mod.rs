// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from files on disk (or a random number generator)
// to tensor batches.
//
//   data/corruptmnist/*.safetensors      (nothing on disk)
//       │                                      │
//       ▼                                      ▼
//   ShardSource                         SyntheticSource
//       └──────────────┬───────────────────────┘
//                      ▼
//   DataSource         → picked once at startup
//                      ▼
//   DigitDataset       → implements Burn's Dataset trait
//                      ▼
//   DigitBatcher       → stacks samples into tensor batches
//                      ▼
//   DataLoader         → feeds batches to the train / eval loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads train_*.safetensors shards and test.safetensors
pub mod loader;

/// Seeded random stand-in data
pub mod synthetic;

/// Chooses between real shards and synthetic data
pub mod source;

/// Implements Burn's Dataset trait for digit samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
