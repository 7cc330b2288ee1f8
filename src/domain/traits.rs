// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer loads tables through TableSource and
// never sees which file format sits behind it.
//
// Implementations:
//   - CsvTableSource → reads a CSV file from disk
//   - (tests)        → in-memory CSV text
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use polars::prelude::DataFrame;

use crate::domain::error::PipelineResult;

/// Anything that can produce a data frame.
pub trait TableSource {
    /// Short label used in log lines and error messages.
    fn name(&self) -> &str;

    /// Read and parse the whole table.
    fn load(&self) -> PipelineResult<DataFrame>;
}
