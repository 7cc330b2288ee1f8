// ============================================================
// Layer 4 — CSV Table Loader
// ============================================================
// Loads the two input files into polars DataFrames:
//
//   train.csv — one row per (store, date): Store, Date, Sales,
//               Customers, Promo, StateHoliday, ...
//   store.csv — one row per store: Store, StoreType, Assortment,
//               CompetitionDistance, PromoInterval, ...
//
// Column types are inferred from the whole file. Cells that are
// empty or spell a missing value ("NA", "NaN", "null") become
// nulls. A file that lacks one of its required columns is
// rejected before any preprocessing starts.
//
// Reference: polars CsvReadOptions documentation
//            Rust Book §9 (Error Handling)

use std::io::Cursor;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::traits::TableSource;

/// Columns train.csv must provide
pub const TRAIN_REQUIRED: &[&str] = &["Store", "Date", "Sales", "Promo", "StateHoliday"];

/// Columns store.csv must provide
pub const STORE_REQUIRED: &[&str] = &[
    "Store",
    "StoreType",
    "Assortment",
    "CompetitionDistance",
    "CompetitionOpenSinceMonth",
    "CompetitionOpenSinceYear",
    "Promo2SinceWeek",
    "Promo2SinceYear",
];

const MISSING_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Reads one CSV file from disk.
/// Implements the TableSource trait from Layer 3.
pub struct CsvTableSource {
    path:     PathBuf,
    name:     String,
    required: &'static [&'static str],
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>, required: &'static [&'static str]) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name, required }
    }

    /// Source for the transaction history file
    pub fn train(path: impl Into<PathBuf>) -> Self {
        Self::new(path, TRAIN_REQUIRED)
    }

    /// Source for the store metadata file
    pub fn store(path: impl Into<PathBuf>) -> Self {
        Self::new(path, STORE_REQUIRED)
    }
}

impl TableSource for CsvTableSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> PipelineResult<DataFrame> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            PipelineError::parse(format!("cannot open '{}': {e}", self.path.display()))
        })?;

        let df = parse_csv(&self.name, bytes)?;
        require_columns(&self.name, &df, self.required)?;

        tracing::info!("Loaded '{}': {} rows x {} columns", self.name, df.height(), df.width());
        Ok(df)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Parse CSV bytes into a DataFrame.
pub fn parse_csv(source: &str, bytes: impl Into<Vec<u8>>) -> PipelineResult<DataFrame> {
    let bytes: Vec<u8> = bytes.into();
    let null_values = NullValues::AllColumns(MISSING_MARKERS.iter().map(|m| (*m).into()).collect());
    let parse_opts = CsvParseOptions::default()
        .with_missing_is_null(true)
        .with_null_values(Some(null_values));

    CsvReadOptions::default()
        .with_has_header(true)
        // Scan every row: a text code such as StateHoliday "a" can first
        // appear deep into a file that opens with numeric-looking values.
        .with_infer_schema_length(None)
        .with_parse_options(parse_opts)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| PipelineError::parse(format!("{source}: {e}")))
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Fail unless every required column is present.
pub fn require_columns(source: &str, df: &DataFrame, required: &[&str]) -> PipelineResult<()> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !has_column(df, name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::parse(format!(
            "{source}: missing required column(s): {}",
            missing.join(", ")
        )))
    }
}
