// ============================================================
// Layer 2 — Preview Use Case
// ============================================================
// Loads both input files and shows what they contain before any
// training happens: shape, missing-value counts and the first rows.

use anyhow::Result;
use polars::prelude::*;

use crate::data::loader::CsvTableSource;
use crate::domain::traits::TableSource;

/// Printable overview of one loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePreview {
    pub source:  String,
    pub rows:    usize,
    pub columns: usize,
    /// (column, missing cells), only for columns with gaps
    pub missing: Vec<(String, usize)>,
    pub head:    String,
}

impl TablePreview {
    pub fn of(source: &str, df: &DataFrame, rows: usize) -> Self {
        let missing = df
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), c.null_count()))
            .filter(|&(_, n)| n > 0)
            .collect();

        Self {
            source:  source.to_string(),
            rows:    df.height(),
            columns: df.width(),
            missing,
            head:    df.head(Some(rows)).to_string(),
        }
    }
}

pub struct PreviewUseCase {
    train: CsvTableSource,
    store: CsvTableSource,
    rows:  usize,
}

impl PreviewUseCase {
    pub fn new(train_csv: &str, store_csv: &str, rows: usize) -> Self {
        Self {
            train: CsvTableSource::train(train_csv),
            store: CsvTableSource::store(store_csv),
            rows,
        }
    }

    pub fn execute(&self) -> Result<Vec<TablePreview>> {
        let previews = [&self.train, &self.store]
            .into_iter()
            .map(|source| Ok(TablePreview::of(source.name(), &source.load()?, self.rows)))
            .collect::<Result<Vec<_>>>()?;
        Ok(previews)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::STORE_CSV;
    use crate::data::loader::parse_csv;

    #[test]
    fn test_preview_reports_shape_and_gaps() {
        let df = parse_csv("store.csv", STORE_CSV).unwrap();
        let preview = TablePreview::of("store.csv", &df, 2);

        assert_eq!(preview.source, "store.csv");
        assert_eq!(preview.rows, 3);
        assert_eq!(preview.columns, 10);
        assert!(preview.missing.contains(&("CompetitionDistance".to_string(), 1)));
        assert!(preview.missing.contains(&("Promo2SinceWeek".to_string(), 1)));
        assert!(!preview.missing.iter().any(|(name, _)| name == "Store"));
        assert!(preview.head.contains("StoreType"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let uc = PreviewUseCase::new("no/such/train.csv", "no/such/store.csv", 5);
        assert!(uc.execute().is_err());
    }
}
