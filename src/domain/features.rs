// ============================================================
// Layer 3 — Feature Table
// ============================================================
// The preprocessor's output: every column numeric, nothing
// missing, categoricals already expanded into indicators.
//
// Columns are stored column-major. The regression target is
// kept apart from the inputs so the model never sees it as a
// feature.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name:   String,
    pub values: Vec<f64>,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    features: Vec<FeatureColumn>,
    target:   FeatureColumn,
}

impl FeatureTable {
    /// All columns must have the target's length.
    pub fn new(features: Vec<FeatureColumn>, target: FeatureColumn) -> Self {
        debug_assert!(features.iter().all(|c| c.values.len() == target.values.len()));
        Self { features, target }
    }

    pub fn row_count(&self) -> usize {
        self.target.values.len()
    }

    /// Number of model inputs
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn features(&self) -> &[FeatureColumn] {
        &self.features
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn target(&self) -> &FeatureColumn {
        &self.target
    }

    /// Any column by name, target included.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        if self.target.name == name {
            return Some(&self.target.values);
        }
        self.features
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// One row of inputs, in feature-column order.
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.features.iter().map(|c| c.values[index]).collect()
    }
}
