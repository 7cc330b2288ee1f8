// ============================================================
// Layer 4 — Table Preprocessor
// ============================================================
// Turns the two loaded DataFrames into a FeatureTable.
//
// Steps (applied in order):
//   1. Left-join train → store on "Store"
//   2. Drop Customers and PromoInterval
//   3. Split Date into Year / Month / Day / WeekOfYear
//   4. Fill missing values from a fixed per-column table
//   5. One-hot encode StoreType / Assortment / StateHoliday,
//      dropping the first category of each
//   6. Standardize the competition, promo and calendar columns
//   7. Check every remaining column is numeric and complete
//
// Unmatched join rows keep every train value and get null store
// attributes; steps 4 and 5 resolve those. Nothing is dropped.
// Shared non-key column names get polars' "_right" suffix on the
// store side.
//
// The target column (Sales) is never scaled.
//
// Reference: polars DataFrame / lazy API documentation

use polars::prelude::*;

use crate::data::loader::{has_column, require_columns, STORE_REQUIRED, TRAIN_REQUIRED};
use crate::data::scaler::{ScalerFit, StandardScaler};
use crate::data::splitter::Split;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::features::{FeatureColumn, FeatureTable};

pub const STORE_KEY: &str = "Store";
pub const DATE_COLUMN: &str = "Date";
pub const TARGET_COLUMN: &str = "Sales";

/// Columns with no predictive use
pub const PRUNED_COLUMNS: &[&str] = &["Customers", "PromoInterval"];

/// Columns expanded into k-1 indicators
pub const CATEGORICAL_COLUMNS: &[&str] = &["StoreType", "Assortment", "StateHoliday"];

/// Columns standardized to zero mean / unit variance
pub const SCALED_COLUMNS: &[&str] = &[
    "CompetitionDistance",
    "CompetitionOpenSinceMonth",
    "CompetitionOpenSinceYear",
    "Promo2SinceWeek",
    "Promo2SinceYear",
    "Year",
    "Month",
    "Day",
    "WeekOfYear",
];

/// Tried in order; the first that parses a cell wins.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

// Temporary columns that carry row identity through the join
const TRAIN_ROW: &str = "__train_row";
const STORE_ROW: &str = "__store_row";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fill {
    Median,
    Zero,
}

/// Missing-value policy. Columns not listed here must arrive complete.
const IMPUTATION: &[(&str, Fill)] = &[
    ("CompetitionDistance", Fill::Median),
    ("CompetitionOpenSinceMonth", Fill::Zero),
    ("CompetitionOpenSinceYear", Fill::Zero),
    ("Promo2", Fill::Zero),
    ("Promo2SinceWeek", Fill::Zero),
    ("Promo2SinceYear", Fill::Zero),
];

/// The FeatureTable together with the scaler that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub table:  FeatureTable,
    pub scaler: StandardScaler,
}

pub struct Preprocessor {
    scaler_fit: ScalerFit,
}

impl Preprocessor {
    pub fn new(scaler_fit: ScalerFit) -> Self {
        Self { scaler_fit }
    }

    /// Run every step. `split` only matters when the scaler is fit
    /// on training rows; its indices refer to train-table rows.
    pub fn run(
        &self,
        train: &DataFrame,
        store: &DataFrame,
        split: &Split,
    ) -> PipelineResult<Preprocessed> {
        require_columns("train table", train, TRAIN_REQUIRED)?;
        require_columns("store table", store, STORE_REQUIRED)?;

        // ── Step 1: Join ──────────────────────────────────────────────────────
        let mut df = left_join(train, store, STORE_KEY)?;

        // ── Step 2: Prune ─────────────────────────────────────────────────────
        for name in PRUNED_COLUMNS {
            if has_column(&df, name) {
                df.drop_in_place(name)?;
            }
        }

        // ── Step 3: Calendar features ─────────────────────────────────────────
        let mut df = decompose_date(df, DATE_COLUMN)?;

        // ── Step 4: Imputation ────────────────────────────────────────────────
        impute(&mut df)?;

        // ── Step 5: One-hot encoding ──────────────────────────────────────────
        for name in CATEGORICAL_COLUMNS {
            one_hot(&mut df, name)?;
        }

        // ── Step 6: Standardize ───────────────────────────────────────────────
        let fit_rows = match self.scaler_fit {
            ScalerFit::FullTable => {
                tracing::warn!(
                    "Scaler is fit on all rows before the train/test split; \
                     held-out rows influence the training-time scaling"
                );
                None
            }
            ScalerFit::TrainingRows => Some(split.train.as_slice()),
        };

        let mut scaler = StandardScaler::new();
        for name in SCALED_COLUMNS {
            let scaled = {
                let series = df
                    .column(name)
                    .map_err(|_| PipelineError::parse(format!("column '{name}' not found for scaling")))?
                    .as_materialized_series();
                scaler.fit(series, fit_rows)?;
                scaler.transform(series)?
            };
            df.with_column(scaled)?;
        }

        // ── Step 7: Numeric, complete columns only ────────────────────────────
        let table = into_feature_table(&df, TARGET_COLUMN)?;
        tracing::info!(
            "Preprocessing complete: {} rows, {} features",
            table.row_count(),
            table.feature_count()
        );

        Ok(Preprocessed { table, scaler })
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(ScalerFit::default())
    }
}

/// Every left row once and in its original order, with the matching
/// right row's columns appended.
fn left_join(left: &DataFrame, right: &DataFrame, key: &str) -> PipelineResult<DataFrame> {
    let right_key = right.column(key)?.as_materialized_series();
    if right_key.n_unique()? != right_key.len() {
        return Err(PipelineError::parse(format!("store table: duplicate {key} values")));
    }

    let left = left.with_row_index(TRAIN_ROW.into(), None)?;
    let right = right.with_row_index(STORE_ROW.into(), None)?;
    let mut joined = left
        .left_join(&right, [key], [key])?
        .sort([TRAIN_ROW], SortMultipleOptions::default())?;

    let unmatched = joined.column(STORE_ROW)?.null_count();
    if unmatched > 0 {
        tracing::warn!(
            "{unmatched} of {} train rows have no matching row in the store table",
            joined.height()
        );
    }

    joined.drop_in_place(TRAIN_ROW)?;
    joined.drop_in_place(STORE_ROW)?;
    Ok(joined)
}

fn parse_date(name: &str, format: &str) -> Expr {
    col(name).cast(DataType::String).str().to_date(StrptimeOptions {
        format: Some(format.into()),
        strict: false,
        exact: true,
        ..Default::default()
    })
}

/// Replace the date column with Year, Month, Day and ISO WeekOfYear.
fn decompose_date(df: DataFrame, name: &str) -> PipelineResult<DataFrame> {
    let raw = df
        .column(name)
        .map_err(|_| PipelineError::parse(format!("no '{name}' column")))?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let parsed = DATE_FORMATS[1..]
        .iter()
        .fold(parse_date(name, DATE_FORMATS[0]), |acc, fmt| {
            when(acc.clone().is_not_null())
                .then(acc)
                .otherwise(parse_date(name, fmt))
        });
    let df = df.lazy().with_column(parsed.alias(name)).collect()?;

    let unparsed = df.column(name)?.as_materialized_series().is_null();
    if let Some(row) = unparsed.into_iter().position(|null| null == Some(true)) {
        let cell = raw.str()?.get(row).unwrap_or("");
        return Err(PipelineError::parse(format!(
            "row {}: cannot parse {name} '{cell}'",
            row + 1
        )));
    }

    let mut df = df
        .lazy()
        .with_columns([
            col(name).dt().year().alias("Year"),
            col(name).dt().month().alias("Month"),
            col(name).dt().day().alias("Day"),
            col(name).dt().week().alias("WeekOfYear"),
        ])
        .collect()?;
    df.drop_in_place(name)?;
    Ok(df)
}

fn impute(df: &mut DataFrame) -> PipelineResult<()> {
    for (name, fill) in IMPUTATION {
        if !has_column(df, name) {
            continue;
        }
        let filled = {
            let values = df
                .column(name)?
                .as_materialized_series()
                .strict_cast(&DataType::Float64)
                .map_err(|_| PipelineError::parse(format!("column '{name}' is not numeric")))?;
            let ca = values.f64()?;

            let missing = ca.null_count();
            if missing == 0 {
                continue;
            }
            let replacement = match fill {
                Fill::Zero => 0.0,
                Fill::Median => ca.median().ok_or_else(|| {
                    PipelineError::parse(format!("column '{name}' has no values to take a median of"))
                })?,
            };
            tracing::debug!("Filled {missing} missing '{name}' values with {replacement}");
            ca.fill_null_with_values(replacement)?.into_series()
        };
        df.with_column(filled)?;
    }
    Ok(())
}

/// Replace a categorical column with one indicator per category
/// except the first (sorted by text). Missing values encode as all zeros.
fn one_hot(df: &mut DataFrame, name: &str) -> PipelineResult<()> {
    let source = df
        .drop_in_place(name)
        .map_err(|_| PipelineError::parse(format!("no '{name}' column to encode")))?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let mut categories: Vec<String> = source
        .drop_nulls()
        .unique()?
        .str()?
        .into_no_null_iter()
        .map(str::to_string)
        .collect();
    categories.sort();

    // to_dummies also emits an indicator for nulls; only named categories are kept
    let kept: Vec<String> = categories
        .iter()
        .skip(1)
        .map(|category| format!("{name}_{category}"))
        .collect();
    let indicators = source
        .to_dummies(None, false)?
        .select(kept.iter().map(String::as_str))?;
    df.hstack_mut(indicators.get_columns())?;

    tracing::debug!(
        "Encoded '{name}': {} categories → {} indicator columns",
        categories.len(),
        kept.len()
    );
    Ok(())
}

/// Split off the target and convert everything to plain f64 columns.
fn into_feature_table(df: &DataFrame, target: &str) -> PipelineResult<FeatureTable> {
    let mut features = Vec::with_capacity(df.width());
    let mut target_col = None;

    for column in df.get_columns() {
        let name = column.name().to_string();
        if column.dtype() == &DataType::String {
            return Err(PipelineError::parse(format!(
                "column '{name}' is not numeric and has no encoding rule"
            )));
        }
        if column.null_count() > 0 {
            return Err(PipelineError::parse(format!(
                "column '{name}' has missing values and no imputation rule"
            )));
        }

        let values: Vec<f64> = column
            .as_materialized_series()
            .cast(&DataType::Float64)?
            .f64()?
            .into_no_null_iter()
            .collect();

        if name == target {
            target_col = Some(FeatureColumn::new(name, values));
        } else {
            features.push(FeatureColumn::new(name, values));
        }
    }

    let target_col =
        target_col.ok_or_else(|| PipelineError::parse(format!("no '{target}' column")))?;
    Ok(FeatureTable::new(features, target_col))
}
