// ============================================================
// Layer 3 — Training History
// ============================================================
// One EpochRecord per finished epoch, in order.
// The trainer appends while it runs; everyone else only reads.
//
// Example:
//   epoch  train_loss  val_loss  train_mae  val_mae
//   1      5.21e6      4.98e6    1873.2     1820.4
//   2      3.02e6      2.87e6    1402.9     1388.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean squared error over the training split
    pub train_loss: f64,

    /// Mean squared error over the held-out split
    pub val_loss: f64,

    /// Mean absolute error over the training split
    pub train_mae: f64,

    /// Mean absolute error over the held-out split
    pub val_mae: f64,
}

impl EpochRecord {
    pub fn is_finite(&self) -> bool {
        self.train_loss.is_finite() && self.val_loss.is_finite()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    records: Vec<EpochRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EpochRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Epoch with the lowest validation loss
    pub fn best_epoch(&self) -> Option<&EpochRecord> {
        self.records
            .iter()
            .min_by(|a, b| a.val_loss.total_cmp(&b.val_loss))
    }

    pub fn train_loss(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.train_loss).collect()
    }

    pub fn val_loss(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.val_loss).collect()
    }

    pub fn train_mae(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.train_mae).collect()
    }

    pub fn val_mae(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.val_mae).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(epoch: usize, val_loss: f64) -> EpochRecord {
        EpochRecord { epoch, train_loss: 1.0, val_loss, train_mae: 0.5, val_mae: 0.5 }
    }

    #[test]
    fn test_best_epoch_is_lowest_val_loss() {
        let mut h = History::new();
        h.push(rec(1, 3.0));
        h.push(rec(2, 1.5));
        h.push(rec(3, 2.0));
        assert_eq!(h.best_epoch().unwrap().epoch, 2);
        assert_eq!(h.val_loss(), vec![3.0, 1.5, 2.0]);
    }

    #[test]
    fn test_non_finite_record() {
        assert!(!rec(1, f64::NAN).is_finite());
        assert!(rec(1, 0.0).is_finite());
    }
}
