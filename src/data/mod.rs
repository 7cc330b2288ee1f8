// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from CSV files to tensor batches.
//
// The pipeline flows in this order:
//
//   train.csv + store.csv
//       │
//       ▼
//   CsvTableSource    → reads files into polars DataFrames
//       │
//       ▼
//   Splitter          → seeded 80/20 row-index split
//       │
//       ▼
//   Preprocessor      → join, prune, dates, impute, one-hot, scale
//       │
//       ▼
//   SalesDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   SalesBatcher      → stacks samples into tensor batches
//
// The split is computed before preprocessing only because it
// depends on nothing but the row count; the preprocessor needs
// it when the scaler is fit on training rows.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads CSV files into polars DataFrames
pub mod loader;

/// Joins, cleans, encodes and scales the raw tables
pub mod preprocessor;

/// Z-score standardization
pub mod scaler;

/// Seeded train/test split of row indices
pub mod splitter;

/// Implements Burn's Dataset trait for sales rows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

#[cfg(test)]
pub mod fixtures;
