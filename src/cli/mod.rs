// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// `clap`, prints the result lines and hands everything else to
// Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — trains the classifier and saves a checkpoint
//   2. `evaluate` — loads a checkpoint and reports test accuracy
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, TrainArgs};

/// The main CLI struct, parsed via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "digit-cnn",
    version,
    about = "Train a small CNN on corrupted MNIST digits, then evaluate a checkpoint."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => Self::run_train(args),
            Commands::Evaluate(args) => Self::run_evaluate(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        println!("Training day and night");
        println!("Learning rate: {}", args.lr);

        let use_case = TrainUseCase::new(args.into());
        let report   = use_case.execute()?;

        println!("Training complete. Model saved to {}", report.checkpoint.display());
        Ok(())
    }

    fn run_evaluate(args: EvaluateArgs) -> Result<()> {
        use crate::application::evaluate_use_case::EvaluateUseCase;

        println!("Evaluating like my life depends on it");
        println!("{}", args.checkpoint);

        let accuracy = EvaluateUseCase::new(args.into()).execute()?;

        println!("Accuracy on test set: {:.2}%", accuracy.percent());
        Ok(())
    }
}
