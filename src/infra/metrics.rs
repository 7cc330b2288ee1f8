// ============================================================
// Layer 6 — History Logger
// ============================================================
// Writes the per-epoch training history to a CSV file.
//
// Columns, one row per completed epoch:
//   epoch, train_loss, val_loss, train_mae, val_mae
//
// Example CSV output:
//   epoch,train_loss,val_loss,train_mae,val_mae
//   1,4.125300,3.981200,1.702100,1.661000
//   2,2.310900,2.402300,1.201800,1.230100
//   ...
//
// How to read it:
//   - Loss should fall from one epoch to the next
//   - val_loss rising while train_loss falls → overfitting
//
// Output file: <report_dir>/history.csv

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::history::History;

pub const HISTORY_FILE: &str = "history.csv";

/// Writes a History as CSV with the csv crate.
pub struct HistoryLogger {
    csv_path: PathBuf,
}

impl HistoryLogger {
    /// Creates the directory if needed. The file is written by `write`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
        Ok(Self { csv_path: dir.join(HISTORY_FILE) })
    }

    /// Replace the file with the given history.
    pub fn write(&self, history: &History) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.csv_path)
            .with_context(|| format!("Cannot create '{}'", self.csv_path.display()))?;

        // EpochRecord's serde field names become the header row
        for record in history.records() {
            wtr.serialize(record)?;
        }
        wtr.flush()?;

        tracing::debug!(
            "Wrote {} epoch(s) to '{}'",
            history.len(),
            self.csv_path.display()
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::EpochRecord;

    #[test]
    fn test_history_round_trips_through_csv() {
        let dir = std::env::temp_dir().join(format!("sales_ann_history_{}", std::process::id()));
        let logger = HistoryLogger::new(&dir).unwrap();

        let mut history = History::new();
        history.push(EpochRecord { epoch: 1, train_loss: 4.0, val_loss: 3.5, train_mae: 1.5, val_mae: 1.25 });
        history.push(EpochRecord { epoch: 2, train_loss: 2.0, val_loss: 2.5, train_mae: 1.0, val_mae: 1.125 });
        logger.write(&history).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("epoch,train_loss,val_loss,train_mae,val_mae"));
        assert_eq!(lines.next(), Some("1,4.0,3.5,1.5,1.25"));
        assert_eq!(lines.count(), 1);

        fs::remove_dir_all(&dir).ok();
    }
}
