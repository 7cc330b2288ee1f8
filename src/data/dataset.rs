use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::features::FeatureTable;

/// One row of model inputs and its sales target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSample {
    pub features: Vec<f32>,
    pub target:   f32,
}

#[derive(Debug, Clone)]
pub struct SalesDataset {
    samples: Vec<SalesSample>,
}

impl SalesDataset {
    pub fn new(samples: Vec<SalesSample>) -> Self { Self { samples } }

    /// The given rows of a feature table, in the given order.
    pub fn from_rows(table: &FeatureTable, rows: &[usize]) -> Self {
        let target = &table.target().values;
        let samples = rows
            .iter()
            .map(|&i| SalesSample {
                features: table.row(i).into_iter().map(|v| v as f32).collect(),
                target:   target[i] as f32,
            })
            .collect();
        Self::new(samples)
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn samples(&self) -> &[SalesSample] { &self.samples }

    pub fn targets(&self) -> Vec<f32> {
        self.samples.iter().map(|s| s.target).collect()
    }
}

impl Dataset<SalesSample> for SalesDataset {
    fn get(&self, index: usize) -> Option<SalesSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
