// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `evaluate`, and
// all their configurable flags.
//
// clap's derive macros generate --help, the error messages for
// missing args and the string → number conversions.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::evaluate_use_case::EvalConfig;
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the digit classifier and save a checkpoint
    Train(TrainArgs),

    /// Report a checkpoint's accuracy on the test set
    Evaluate(EvaluateArgs),
}

/// All arguments for the `train` command
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Samples per mini-batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Directory holding train_*.safetensors and test.safetensors
    #[arg(long, default_value = "data/corruptmnist")]
    pub data_dir: String,

    /// Where to write the trained parameters (.mpk)
    #[arg(long, default_value = "models/model.mpk")]
    pub checkpoint: String,

    /// Seeds model initialisation, shuffling and synthetic data
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Training samples to generate when no shards are found
    #[arg(long, default_value_t = 100)]
    pub synthetic_train: usize,

    /// Test samples to generate when no shards are found
    #[arg(long, default_value_t = 10)]
    pub synthetic_test: usize,

    /// Append per-epoch loss to this CSV file
    #[arg(long)]
    pub metrics: Option<String>,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:        a.data_dir,
            checkpoint:      a.checkpoint,
            batch_size:      a.batch_size,
            epochs:          a.epochs,
            lr:              a.lr,
            seed:            a.seed,
            synthetic_train: a.synthetic_train,
            synthetic_test:  a.synthetic_test,
            metrics:         a.metrics,
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Checkpoint written by `train`
    pub checkpoint: String,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    #[arg(long, default_value = "data/corruptmnist")]
    pub data_dir: String,

    /// Must match the training seed to reuse its synthetic test set
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Must match the training run's --synthetic-train for the same reason
    #[arg(long, default_value_t = 100)]
    pub synthetic_train: usize,

    #[arg(long, default_value_t = 10)]
    pub synthetic_test: usize,
}

impl From<EvaluateArgs> for EvalConfig {
    fn from(a: EvaluateArgs) -> Self {
        EvalConfig {
            checkpoint:      a.checkpoint,
            data_dir:        a.data_dir,
            batch_size:      a.batch_size,
            seed:            a.seed,
            synthetic_train: a.synthetic_train,
            synthetic_test:  a.synthetic_test,
        }
    }
}
