// ============================================================
// Layer 2 — Session Context
// ============================================================
// Everything that is computed once per process and shared by
// every training request:
//
//   raw tables → split → preprocessed FeatureTable + scaler
//
// A SessionContext is immutable after prepare(). Training
// requests borrow it, so a failed request cannot damage it.

use polars::prelude::*;

use crate::data::preprocessor::{Preprocessor, TARGET_COLUMN};
use crate::data::scaler::{ScalerFit, StandardScaler};
use crate::data::splitter::{Split, Splitter};
use crate::domain::error::PipelineResult;
use crate::domain::features::FeatureTable;
use crate::domain::traits::TableSource;

#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Sales exactly as loaded, before the join
    raw_sales:  Vec<f64>,
    features:   FeatureTable,
    scaler:     StandardScaler,
    split:      Split,
    scaler_fit: ScalerFit,
}

impl SessionContext {
    /// Load both tables from their sources and prepare them.
    pub fn load(
        train:      &dyn TableSource,
        store:      &dyn TableSource,
        scaler_fit: ScalerFit,
    ) -> PipelineResult<Self> {
        tracing::debug!("Loading '{}' and '{}'", train.name(), store.name());
        Self::prepare(train.load()?, store.load()?, scaler_fit)
    }

    pub fn prepare(
        train_raw:  DataFrame,
        store_raw:  DataFrame,
        scaler_fit: ScalerFit,
    ) -> PipelineResult<Self> {
        let split = Splitter::default().split(train_raw.height());
        let prepared = Preprocessor::new(scaler_fit).run(&train_raw, &store_raw, &split)?;
        let raw_sales = non_null_values(&train_raw, TARGET_COLUMN)?;

        tracing::info!(
            "Session ready: {} rows, {} features ({} train / {} test of {})",
            prepared.table.row_count(),
            prepared.table.feature_count(),
            split.train.len(),
            split.test.len(),
            split.total()
        );

        Ok(Self {
            raw_sales,
            features: prepared.table,
            scaler: prepared.scaler,
            split,
            scaler_fit,
        })
    }

    pub fn features(&self) -> &FeatureTable { &self.features }
    pub fn scaler(&self) -> &StandardScaler { &self.scaler }
    pub fn split(&self) -> &Split         { &self.split }
    pub fn scaler_fit(&self) -> ScalerFit { self.scaler_fit }

    /// Non-missing values of the train CSV's Sales column, as loaded.
    pub fn raw_sales(&self) -> &[f64] { &self.raw_sales }

    /// The target over the training split, after preprocessing.
    pub fn training_target(&self) -> Vec<f64> {
        self.split.train_values(&self.features.target().values)
    }
}

fn non_null_values(df: &DataFrame, name: &str) -> PipelineResult<Vec<f64>> {
    let values = df.column(name)?.as_materialized_series().cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().flatten().collect())
}
