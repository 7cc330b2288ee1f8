// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `preview` and `train`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, enums via FromStr)
//
// Range checks (e.g. 1–5 hidden layers) happen in the domain
// layer, so the CLI and any other caller get the same errors.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::domain::hyperparams::{ActivationKind, HyperparameterConfig, OptimizerKind};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the shape, gaps and first rows of both input files
    Preview(PreviewArgs),

    /// Preprocess the data, train the network and write a report
    Train(TrainArgs),
}

/// Arguments for the `preview` command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Daily sales history (train.csv)
    #[arg(long)]
    pub train_csv: String,

    /// Store metadata (store.csv)
    #[arg(long)]
    pub store_csv: String,

    /// Number of rows to show from each file
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Daily sales history (train.csv)
    #[arg(long)]
    pub train_csv: String,

    /// Store metadata (store.csv)
    #[arg(long)]
    pub store_csv: String,

    /// Directory for charts, history and summary files
    #[arg(long, default_value = "report")]
    pub report_dir: String,

    /// Number of hidden blocks (1–5)
    #[arg(long, default_value_t = 3)]
    pub layers: usize,

    /// Units per hidden block (32–256)
    #[arg(long, default_value_t = 128)]
    pub neurons: usize,

    /// Hidden activation: relu, tanh or sigmoid
    #[arg(long, default_value = "relu")]
    pub activation: ActivationKind,

    /// Dropout probability after each hidden block (0.0–0.5)
    #[arg(long, default_value_t = 0.3)]
    pub dropout: f64,

    /// Optimizer: adam, sgd or rmsprop
    #[arg(long, default_value = "adam")]
    pub optimizer: OptimizerKind,

    /// Learning rate (0.0001–0.01)
    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// Full passes over the training split (10–100)
    #[arg(long, default_value_t = 50)]
    pub epochs: usize,

    /// Seeds weight init, dropout and batch order
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fit the standard scaler on training rows only instead of the full table
    #[arg(long)]
    pub scale_on_train_only: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_csv:   a.train_csv,
            store_csv:   a.store_csv,
            report_dir:  a.report_dir,
            hyperparams: HyperparameterConfig {
                layers:        a.layers,
                neurons:       a.neurons,
                activation:    a.activation,
                dropout:       a.dropout,
                optimizer:     a.optimizer,
                learning_rate: a.lr,
                epochs:        a.epochs,
            },
            seed:                a.seed,
            scale_on_train_only: a.scale_on_train_only,
        }
    }
}
