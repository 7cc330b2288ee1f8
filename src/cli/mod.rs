// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `preview` — loads both CSV files and prints their heads
//   2. `train`   — trains the network and writes a report
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PreviewArgs, TrainArgs};

use crate::application::pipeline::TrainResult;
use crate::application::preview_use_case::{PreviewUseCase, TablePreview};
use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::ml::model::LayerSummary;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "sales-ann",
    version = "0.1.0",
    about = "Train a feed-forward network to predict daily store sales from two CSV files."
)]
pub struct Cli {
    /// The subcommand to run (preview or train)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Preview(args) => run_preview(args),
            Commands::Train(args)   => run_train(args),
        }
    }
}

fn run_preview(args: PreviewArgs) -> Result<()> {
    let use_case = PreviewUseCase::new(&args.train_csv, &args.store_csv, args.rows);
    for preview in use_case.execute()? {
        print_preview(&preview);
    }
    Ok(())
}

/// Converts CLI args into a TrainConfig and hands off to Layer 2.
fn run_train(args: TrainArgs) -> Result<()> {
    let config: TrainConfig = args.into();
    tracing::info!(
        "Starting training on '{}' + '{}'",
        config.train_csv,
        config.store_csv
    );

    let report_dir = config.report_dir.clone();
    let result = TrainUseCase::new(config).execute()?;

    print_result(&result);
    println!("\nReport written to '{report_dir}'.");
    Ok(())
}

fn print_preview(p: &TablePreview) {
    println!("\n=== {} ({} rows x {} columns) ===", p.source, p.rows, p.columns);
    println!("{}", p.head);
    if p.missing.is_empty() {
        println!("No missing values.");
    } else {
        println!("Missing values:");
        for (name, count) in &p.missing {
            println!("  {name:<28} {count}");
        }
    }
}

fn print_result(result: &TrainResult) {
    let m = &result.evaluation.metrics;
    println!("\nTest set:");
    println!("  MSE: {:.4}", m.mse);
    println!("  MAE: {:.4}", m.mae);
    println!("  R²:  {:.4}", m.r2);

    println!("\nModel summary:");
    print_layers(&result.layers);
    println!(
        "Total params: {} (trainable: {}, non-trainable: {})",
        result.total_params(),
        result.trainable_params(),
        result.total_params() - result.trainable_params()
    );
}

fn print_layers(layers: &[LayerSummary]) {
    println!("  {:<26} {:<20} {:<14} {:>10}", "Layer", "Type", "Output shape", "Params");
    for l in layers {
        println!(
            "  {:<26} {:<20} {:<14} {:>10}",
            l.name, l.kind, l.output_shape, l.params()
        );
    }
}
