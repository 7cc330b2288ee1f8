// ============================================================
// Layer 4 — Sales Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<SalesSample>
// into tensors.
//
// How batching works here:
//   Input:  Vec of N SalesSamples, each with F features
//   Output: SalesBatch with features [N, F] and targets [N, 1]
//
//   We flatten all feature rows into one long Vec, then reshape:
//   [s1_f1, s1_f2, ..., s1_fF, s2_f1, ..., sN_fF] → [N, F]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SalesSample;

/// A batch of rows ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct SalesBatch<B: Backend> {
    /// Model inputs — shape: [batch_size, num_features]
    pub features: Tensor<B, 2>,

    /// Sales targets — shape: [batch_size, 1]
    pub targets: Tensor<B, 2>,
}

/// Holds the target device so tensors are created in the right place.
#[derive(Clone, Debug)]
pub struct SalesBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SalesBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SalesSample, SalesBatch<B>> for SalesBatcher<B> {
    fn batch(&self, items: Vec<SalesSample>) -> SalesBatch<B> {
        let batch_size   = items.len();
        let num_features = items.first().map(|s| s.features.len()).unwrap_or(0);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();
        let targets: Vec<f32> = items.iter().map(|s| s.target).collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, num_features]),
            &self.device,
        );
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [batch_size, 1]),
            &self.device,
        );

        SalesBatch { features, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_order() {
        let device = Default::default();
        let batcher = SalesBatcher::<NdArray>::new(device);
        let batch = batcher.batch(vec![
            SalesSample { features: vec![1.0, 2.0, 3.0], target: 10.0 },
            SalesSample { features: vec![4.0, 5.0, 6.0], target: 20.0 },
        ]);

        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2, 1]);

        let second_row: Vec<f32> = batch
            .features
            .slice([1..2, 0..3])
            .into_data()
            .iter::<f32>()
            .collect();
        assert_eq!(second_row, vec![4.0, 5.0, 6.0]);
    }
}
