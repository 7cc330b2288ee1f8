// ============================================================
// Layer 6 — Report Writer
// ============================================================
// Saves everything a training run produced into one directory.
//
// What gets written:
//   1. train_config.json — the resolved TrainConfig
//   2. history.csv       — one row per epoch      (metrics.rs)
//   3. summary.json      — test metrics, layer summary, data sizes
//   4. *.svg             — the five charts        (charts.rs)
//
// File layout:
//   report/
//     train_config.json
//     history.csv
//     summary.json
//     loss.svg
//     mae.svg
//     predicted_vs_actual.svg
//     residuals.svg
//     sales_distribution.svg
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::PathBuf};

use crate::application::pipeline::TrainResult;
use crate::application::session::SessionContext;
use crate::application::train_use_case::TrainConfig;
use crate::data::scaler::{ScalerFit, StandardScaler};
use crate::infra::{charts::ChartRenderer, metrics::HistoryLogger};
use crate::ml::evaluator::RegressionMetrics;
use crate::ml::model::LayerSummary;

pub const CONFIG_FILE: &str  = "train_config.json";
pub const SUMMARY_FILE: &str = "summary.json";

/// The contents of summary.json
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub metrics:          RegressionMetrics,
    pub epochs_completed: usize,
    /// Epoch with the lowest validation loss
    pub best_epoch:       Option<usize>,
    pub train_rows:       usize,
    pub test_rows:        usize,
    pub features:         Vec<String>,
    /// Which rows the standard scaler was fit on
    pub scaler_fit:       ScalerFit,
    /// Per-column mean and scale of the fitted standardizer
    pub scaler:           StandardScaler,
    pub total_params:     usize,
    pub trainable_params: usize,
    pub layers:           Vec<LayerSummary>,
}

impl RunSummary {
    pub fn new(session: &SessionContext, result: &TrainResult) -> Self {
        Self {
            metrics:          result.evaluation.metrics,
            epochs_completed: result.history.len(),
            best_epoch:       result.history.best_epoch().map(|r| r.epoch),
            train_rows:       session.split().train.len(),
            test_rows:        session.split().test.len(),
            features:         session.features().feature_names().iter().map(|s| s.to_string()).collect(),
            scaler_fit:       session.scaler_fit(),
            scaler:           session.scaler().clone(),
            total_params:     result.total_params(),
            trainable_params: result.trainable_params(),
            layers:           result.layers.clone(),
        }
    }
}

/// Owns the report directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Creates the directory (and parents) if it doesn't exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create report directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<PathBuf> {
        self.save_json(CONFIG_FILE, cfg)
    }

    pub fn save_summary(&self, summary: &RunSummary) -> Result<PathBuf> {
        self.save_json(SUMMARY_FILE, summary)
    }

    /// Write history, summary and charts for a finished run.
    /// The config is expected to be saved already.
    pub fn write_run(&self, session: &SessionContext, result: &TrainResult) -> Result<Vec<PathBuf>> {
        let history = HistoryLogger::new(&self.dir)?;
        history.write(&result.history)?;

        let mut written = vec![
            history.csv_path().to_path_buf(),
            self.save_summary(&RunSummary::new(session, result))?,
        ];
        written.extend(ChartRenderer::new(&self.dir).render_all(&result.charts)?);

        tracing::info!("Report written to '{}' ({} files)", self.dir.display(), written.len());
        Ok(written)
    }

    fn save_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved '{}'", path.display());
        Ok(path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::{train, TrainRequest};
    use crate::data::fixtures::{train_csv_with_days, STORE_CSV};
    use crate::data::loader::parse_csv;
    use crate::domain::hyperparams::HyperparameterConfig;
    use crate::infra::charts::{
        DISTRIBUTION_CHART, LOSS_CHART, MAE_CHART, RESIDUAL_CHART, SCATTER_CHART,
    };
    use crate::infra::metrics::HISTORY_FILE;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sales_ann_report_{tag}_{}", std::process::id()))
    }

    #[test]
    fn test_save_config_writes_pretty_json() {
        let dir = temp_dir("config");
        let writer = ReportWriter::new(&dir).unwrap();

        let path = writer.save_config(&TrainConfig::default()).unwrap();
        assert_eq!(path, dir.join(CONFIG_FILE));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["layers"], 3);
        assert_eq!(json["optimizer"], "adam");
        assert_eq!(json["scale_on_train_only"], false);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_new_creates_nested_directory() {
        let dir = temp_dir("nested").join("a").join("b");
        ReportWriter::new(&dir).unwrap();
        assert!(dir.is_dir());
        fs::remove_dir_all(temp_dir("nested")).ok();
    }

    #[test]
    fn test_write_run_renders_every_file() {
        let train_df = parse_csv("train.csv", train_csv_with_days(30)).unwrap();
        let store_df = parse_csv("store.csv", STORE_CSV).unwrap();
        let session = SessionContext::prepare(train_df, store_df, ScalerFit::FullTable).unwrap();
        let request = TrainRequest {
            hyperparams: HyperparameterConfig {
                layers: 1,
                neurons: 32,
                epochs: 10,
                ..Default::default()
            },
            seed: 42,
        };
        let result = train(&session, &request).unwrap();

        let dir = temp_dir("run");
        let written = ReportWriter::new(&dir).unwrap().write_run(&session, &result).unwrap();
        assert_eq!(written.len(), 7);

        for name in [
            HISTORY_FILE,
            SUMMARY_FILE,
            LOSS_CHART,
            MAE_CHART,
            SCATTER_CHART,
            RESIDUAL_CHART,
            DISTRIBUTION_CHART,
        ] {
            let path = dir.join(name);
            assert!(written.contains(&path), "{name} not reported");
            let len = fs::metadata(&path).unwrap().len();
            assert!(len > 0, "{name} is empty");
        }

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(summary["epochs_completed"], 10);
        assert_eq!(summary["test_rows"], 18);
        assert_eq!(summary["scaler_fit"], "full_table");
        assert_eq!(summary["scaler"]["params"].as_array().unwrap().len(), 9);

        let svg = fs::read_to_string(dir.join(LOSS_CHART)).unwrap();
        assert!(svg.contains("<svg"));

        fs::remove_dir_all(&dir).ok();
    }
}
