// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one full training run from the command line:
//
//   Step 1: Load train.csv and store.csv      (Layer 4 - data)
//   Step 2: Split, preprocess, scale          (Layer 4 - data)
//   Step 3: Save config                       (Layer 6 - infra)
//   Step 4: Train and evaluate                (Layer 5 - ml, via pipeline)
//   Step 5: Write history, summary, charts    (Layer 6 - infra)
//
// Reference: Rust Book §9 (Error Handling)
//            Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::pipeline::{self, TrainRequest, TrainResult};
use crate::application::session::SessionContext;
use crate::data::loader::CsvTableSource;
use crate::data::scaler::ScalerFit;
use crate::data::splitter::DEFAULT_SEED;
use crate::domain::hyperparams::HyperparameterConfig;
use crate::infra::report::ReportWriter;

// ─── Training Configuration ──────────────────────────────────────────────────
// Inputs, outputs and hyperparameters for one run.
// Serialisable so the exact settings land in the report directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_csv:           String,
    pub store_csv:           String,
    pub report_dir:          String,
    #[serde(flatten)]
    pub hyperparams:         HyperparameterConfig,
    pub seed:                u64,
    pub scale_on_train_only: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_csv:           "data/train.csv".to_string(),
            store_csv:           "data/store.csv".to_string(),
            report_dir:          "report".to_string(),
            hyperparams:         HyperparameterConfig::default(),
            seed:                DEFAULT_SEED,
            scale_on_train_only: false,
        }
    }
}

impl TrainConfig {
    pub fn scaler_fit(&self) -> ScalerFit {
        if self.scale_on_train_only {
            ScalerFit::TrainingRows
        } else {
            ScalerFit::FullTable
        }
    }

    pub fn request(&self) -> TrainRequest {
        TrainRequest { hyperparams: self.hyperparams.clone(), seed: self.seed }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full run end to end.
    pub fn execute(&self) -> Result<TrainResult> {
        let cfg = &self.config;

        // Reject bad hyperparameters before reading any data
        cfg.hyperparams.validate()?;

        // ── Step 1 + 2: Load and prepare ──────────────────────────────────────
        let session = SessionContext::load(
            &CsvTableSource::train(&cfg.train_csv),
            &CsvTableSource::store(&cfg.store_csv),
            cfg.scaler_fit(),
        )
        .context("Cannot prepare the input tables")?;

        // ── Step 3: Save config ───────────────────────────────────────────────
        let report = ReportWriter::new(&cfg.report_dir)?;
        report.save_config(cfg)?;

        // ── Step 4: Train ─────────────────────────────────────────────────────
        let result = pipeline::train(&session, &cfg.request()).context("Training failed")?;

        // ── Step 5: Report ────────────────────────────────────────────────────
        report.write_run(&session, &result)?;

        Ok(result)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;

    #[test]
    fn test_scaler_fit_follows_flag() {
        let mut cfg = TrainConfig::default();
        assert_eq!(cfg.scaler_fit(), ScalerFit::FullTable);
        cfg.scale_on_train_only = true;
        assert_eq!(cfg.scaler_fit(), ScalerFit::TrainingRows);
    }

    #[test]
    fn test_config_json_round_trip_keeps_hyperparams_flat() {
        let cfg = TrainConfig { seed: 9, ..Default::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"neurons\":128"));
        assert_eq!(serde_json::from_str::<TrainConfig>(&json).unwrap(), cfg);
    }

    #[test]
    fn test_invalid_hyperparams_fail_before_loading() {
        let mut cfg = TrainConfig {
            train_csv: "does/not/exist.csv".to_string(),
            ..Default::default()
        };
        cfg.hyperparams.epochs = 500;

        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Config(_))
        ));
    }
}
