// ============================================================
// Layer 4 — Z-score Standardizer
// ============================================================
// (x - mean) / std per column, with statistics fit on a chosen
// set of rows and then applied to every row of the Series.
//
//   - std is the population deviation (ddof 0)
//   - a constant column gets scale 1.0, so it maps to all zeros
//
// ScalerFit records which rows the statistics came from. Fitting
// on the full table lets the held-out rows influence the scaling
// of the training rows; TrainingRows avoids that.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

/// Which rows the scaler statistics are computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerFit {
    /// Every row, before the train/test split
    #[default]
    FullTable,
    /// Only the rows of the training split
    TrainingRows,
}

/// Fitted parameters for one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub mean:  f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// (column name, stats) in fit order
    params: Vec<(String, ColumnStats)>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the Series' column. `rows` selects the rows to fit on; None means all.
    pub fn fit(&mut self, series: &Series, rows: Option<&[usize]>) -> PipelineResult<ColumnStats> {
        let name = series.name().to_string();
        let series = series.cast(&DataType::Float64)?;
        let sample = match rows {
            Some(idx) => {
                let idx: Vec<IdxSize> = idx.iter().map(|&i| i as IdxSize).collect();
                series.take_slice(&idx)?
            }
            None => series,
        };

        let ca = sample.f64()?;
        let (Some(mean), Some(std)) = (ca.mean(), ca.std(0)) else {
            return Err(PipelineError::parse(format!(
                "cannot fit scaler on column '{name}': no rows"
            )));
        };

        let stats = ColumnStats {
            mean,
            scale: if std == 0.0 { 1.0 } else { std },
        };

        self.params.retain(|(col, _)| *col != name);
        self.params.push((name, stats));
        Ok(stats)
    }

    pub fn stats(&self, name: &str) -> Option<ColumnStats> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, s)| *s)
    }

    /// Scale a fitted column. The result keeps the Series' name.
    pub fn transform(&self, series: &Series) -> PipelineResult<Series> {
        let stats = self.fitted(series)?;
        self.map_values(series, |v| (v - stats.mean) / stats.scale)
    }

    fn fitted(&self, series: &Series) -> PipelineResult<ColumnStats> {
        self.stats(series.name().as_str()).ok_or_else(|| {
            PipelineError::parse(format!("scaler was not fit on column '{}'", series.name()))
        })
    }

    fn map_values(&self, series: &Series, f: impl Fn(f64) -> f64) -> PipelineResult<Series> {
        let cast = series.cast(&DataType::Float64)?;
        let mapped: Float64Chunked = cast.f64()?.into_iter().map(|opt| opt.map(&f)).collect();
        Ok(mapped.with_name(series.name().clone()).into_series())
    }
}
