// ============================================================
// Layer 2 — Training Pipeline
// ============================================================
// One training request against a prepared session:
//
//   Step 1: Validate hyperparameters
//   Step 2: Build train / test datasets from the split  (Layer 4)
//   Step 3: Seed the backend and build the model        (Layer 5)
//   Step 4: Fit                                          (Layer 5)
//   Step 5: Evaluate on the test split                   (Layer 5)
//   Step 6: Assemble chart data and the layer summary
//
// No files are written here; rendering is infra's job.

use burn::{module::AutodiffModule, tensor::backend::Backend};
use serde::{Deserialize, Serialize};

use crate::application::session::SessionContext;
use crate::data::dataset::SalesDataset;
use crate::data::splitter::DEFAULT_SEED;
use crate::domain::error::PipelineResult;
use crate::domain::history::History;
use crate::domain::hyperparams::HyperparameterConfig;
use crate::ml::evaluator::{self, ChartData, Evaluation};
use crate::ml::model::{LayerSummary, SalesRegressorConfig};
use crate::ml::trainer::{Device, TrainBackend, Trainer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRequest {
    pub hyperparams: HyperparameterConfig,
    /// Seeds weight init, dropout masks and batch order
    pub seed:        u64,
}

impl Default for TrainRequest {
    fn default() -> Self {
        Self { hyperparams: HyperparameterConfig::default(), seed: DEFAULT_SEED }
    }
}

#[derive(Debug, Clone)]
pub struct TrainResult {
    pub history:    History,
    pub evaluation: Evaluation,
    pub charts:     ChartData,
    pub layers:     Vec<LayerSummary>,
}

impl TrainResult {
    pub fn total_params(&self) -> usize {
        self.layers.iter().map(LayerSummary::params).sum()
    }

    pub fn trainable_params(&self) -> usize {
        self.layers.iter().map(|l| l.trainable_params).sum()
    }
}

/// Train and evaluate one network. The session is only read.
pub fn train(session: &SessionContext, request: &TrainRequest) -> PipelineResult<TrainResult> {
    let hp = &request.hyperparams;

    // ── Step 1: Validate ──────────────────────────────────────────────────────
    hp.validate()?;

    // ── Step 2: Datasets ──────────────────────────────────────────────────────
    let split = session.split();
    let train_dataset = SalesDataset::from_rows(session.features(), &split.train);
    let test_dataset  = SalesDataset::from_rows(session.features(), &split.test);

    // ── Step 3: Model ─────────────────────────────────────────────────────────
    let device = Device::default();
    TrainBackend::seed(request.seed);

    let model = SalesRegressorConfig::from_hyperparams(session.features().feature_count(), hp)
        .init::<TrainBackend>(&device)?;
    let layers = model.summary();
    tracing::info!(
        "Built {} hidden block(s) x {} {} units, {} parameters",
        model.hidden_block_count(),
        hp.neurons,
        hp.activation,
        layers.iter().map(LayerSummary::params).sum::<usize>()
    );

    // ── Step 4: Fit ───────────────────────────────────────────────────────────
    let mut trainer = Trainer::new(device.clone());
    let model = trainer.fit(model, hp, train_dataset, test_dataset.clone(), request.seed)?;

    // ── Step 5: Evaluate ──────────────────────────────────────────────────────
    let evaluation = evaluator::evaluate(&model.valid(), &test_dataset, &device);

    // ── Step 6: Charts ────────────────────────────────────────────────────────
    let history = trainer.into_history();
    let charts = ChartData::build(
        &history,
        &evaluation,
        session.raw_sales(),
        &session.training_target(),
    );

    Ok(TrainResult { history, evaluation, charts, layers })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{train_csv_with_days, STORE_CSV};
    use crate::data::loader::parse_csv;
    use crate::data::scaler::ScalerFit;
    use crate::domain::error::PipelineError;

    fn session() -> SessionContext {
        let train = parse_csv("train.csv", train_csv_with_days(30)).unwrap();
        let store = parse_csv("store.csv", STORE_CSV).unwrap();
        SessionContext::prepare(train, store, ScalerFit::FullTable).unwrap()
    }

    fn request(epochs: usize) -> TrainRequest {
        TrainRequest {
            hyperparams: HyperparameterConfig {
                layers: 1,
                neurons: 32,
                epochs,
                ..Default::default()
            },
            seed: 7,
        }
    }

    #[test]
    fn test_train_returns_full_result() {
        let session = session();
        let result = train(&session, &request(10)).unwrap();

        assert_eq!(result.history.len(), 10);
        // 90 rows, ceil(90 * 0.2) held out
        assert_eq!(result.evaluation.predictions.len(), 18);
        assert_eq!(result.charts.loss.train.len(), 10);
        assert_eq!(result.charts.sales_raw.total(), 90);
        assert_eq!(result.charts.sales_train.total(), 72);
        assert_eq!(result.layers.len(), 4);
        assert!(result.evaluation.metrics.mse.is_finite());
        assert!(result.total_params() > result.trainable_params());
    }

    #[test]
    fn test_invalid_request_leaves_session_usable() {
        let session = session();
        let before = session.features().clone();

        let mut bad = request(10);
        bad.hyperparams.layers = 6;
        let err = train(&session, &bad).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));

        assert_eq!(session.features(), &before);
        assert!(train(&session, &request(10)).is_ok());
    }
}
