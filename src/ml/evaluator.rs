// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs the trained model over the test split and turns the
// results into numbers and chart-ready series.
//
//   Evaluation   — MSE, MAE, R² plus the raw predictions
//   ChartData    — everything infra::charts needs to draw
//
// Predictions are made with the model on EvalBackend, so dropout
// is off and batch-norm uses its running statistics.

use burn::data::dataloader::batcher::Batcher;
use serde::Serialize;

use crate::data::{batcher::SalesBatcher, dataset::SalesDataset};
use crate::domain::history::History;
use crate::ml::model::SalesRegressor;
use crate::ml::trainer::{Device, EvalBackend, BATCH_SIZE};

/// Number of bins in each sales histogram
pub const HISTOGRAM_BINS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub mae: f64,
    pub r2:  f64,
}

impl RegressionMetrics {
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        let n = actual.len().min(predicted.len());
        if n == 0 {
            return Self { mse: 0.0, mae: 0.0, r2: 0.0 };
        }

        let pairs = || actual.iter().zip(predicted).take(n);
        let ss_res: f64 = pairs().map(|(a, p)| (a - p).powi(2)).sum();
        let abs_sum: f64 = pairs().map(|(a, p)| (a - p).abs()).sum();

        let mean = actual[..n].iter().sum::<f64>() / n as f64;
        let ss_tot: f64 = actual[..n].iter().map(|a| (a - mean).powi(2)).sum();

        let r2 = if ss_tot == 0.0 {
            if ss_res == 0.0 { 1.0 } else { 0.0 }
        } else {
            1.0 - ss_res / ss_tot
        };

        Self { mse: ss_res / n as f64, mae: abs_sum / n as f64, r2 }
    }
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub metrics:     RegressionMetrics,
    pub actual:      Vec<f64>,
    pub predictions: Vec<f64>,
}

impl Evaluation {
    /// actual − predicted, per test row
    pub fn residuals(&self) -> Vec<f64> {
        self.actual
            .iter()
            .zip(&self.predictions)
            .map(|(a, p)| a - p)
            .collect()
    }
}

/// Predict every row of `dataset` in dataset order.
pub fn predict(
    model:   &SalesRegressor<EvalBackend>,
    dataset: &SalesDataset,
    device:  &Device,
) -> Vec<f64> {
    let batcher = SalesBatcher::<EvalBackend>::new(device.clone());
    dataset
        .samples()
        .chunks(BATCH_SIZE)
        .flat_map(|chunk| {
            let batch = batcher.batch(chunk.to_vec());
            model
                .forward(batch.features)
                .into_data()
                .iter::<f32>()
                .map(f64::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn evaluate(
    model:   &SalesRegressor<EvalBackend>,
    dataset: &SalesDataset,
    device:  &Device,
) -> Evaluation {
    let predictions = predict(model, dataset, device);
    let actual: Vec<f64> = dataset.targets().into_iter().map(f64::from).collect();
    let metrics = RegressionMetrics::compute(&actual, &predictions);

    tracing::info!(
        "Test metrics: mse={:.4} mae={:.4} r2={:.4}",
        metrics.mse, metrics.mae, metrics.r2
    );
    Evaluation { metrics, actual, predictions }
}

// ─── Chart data ───────────────────────────────────────────────────────────────

/// Equal-width histogram bin [lower, upper)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// `bins` equal-width bins over [min, max]. The last bin is closed.
    /// A constant series gets the range [v - 0.5, v + 0.5].
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self::default();
        }

        let (mut lo, mut hi) = min_max(&finite);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in &finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: lo + i as f64 * width,
                upper: lo + (i + 1) as f64 * width,
                count,
            })
            .collect();
        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurvePair {
    pub train:      Vec<f64>,
    pub validation: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct ChartData {
    pub loss:          CurvePair,
    pub mae:           CurvePair,
    /// (actual, predicted)
    pub scatter:       Vec<(f64, f64)>,
    /// Endpoints of the y = x reference line
    pub identity_line: (f64, f64),
    /// (predicted, actual − predicted)
    pub residuals:     Vec<(f64, f64)>,
    /// Raw `Sales` from the train CSV
    pub sales_raw:     Histogram,
    /// Target of the training split after preprocessing
    pub sales_train:   Histogram,
}

impl ChartData {
    pub fn build(
        history:     &History,
        evaluation:  &Evaluation,
        raw_sales:   &[f64],
        train_sales: &[f64],
    ) -> Self {
        let scatter: Vec<(f64, f64)> = evaluation
            .actual
            .iter()
            .copied()
            .zip(evaluation.predictions.iter().copied())
            .collect();
        let identity_line = if evaluation.actual.is_empty() {
            (0.0, 0.0)
        } else {
            min_max(&evaluation.actual)
        };
        let residuals = evaluation
            .predictions
            .iter()
            .copied()
            .zip(evaluation.residuals())
            .collect();

        Self {
            loss: CurvePair { train: history.train_loss(), validation: history.val_loss() },
            mae:  CurvePair { train: history.train_mae(),  validation: history.val_mae() },
            scatter,
            identity_line,
            residuals,
            sales_raw:   Histogram::from_values(raw_sales, HISTOGRAM_BINS),
            sales_train: Histogram::from_values(train_sales, HISTOGRAM_BINS),
        }
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}
