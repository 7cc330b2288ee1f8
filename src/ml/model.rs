use burn::{
    module::Ignored,
    nn::{
        loss::{MseLoss, Reduction},
        BatchNorm, BatchNormConfig,
        Dropout, DropoutConfig,
        Initializer,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation,
};
use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::hyperparams::{check_architecture, ActivationKind, HyperparameterConfig};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct SalesRegressorConfig {
    pub num_features: usize,
    pub layers:       usize,
    pub neurons:      usize,
    pub activation:   ActivationKind,
    pub dropout:      f64,
}

impl SalesRegressorConfig {
    pub fn from_hyperparams(num_features: usize, hp: &HyperparameterConfig) -> Self {
        Self::new(num_features, hp.layers, hp.neurons, hp.activation, hp.dropout)
    }

    /// Build the network: `layers` hidden blocks, then a 1-unit linear head.
    pub fn init<B: Backend>(&self, device: &B::Device) -> PipelineResult<SalesRegressor<B>> {
        check_architecture(self.layers, self.neurons)?;
        if self.num_features == 0 {
            return Err(PipelineError::config("feature table has no input columns"));
        }

        let blocks: Vec<HiddenBlock<B>> = (0..self.layers)
            .map(|i| {
                let d_in = if i == 0 { self.num_features } else { self.neurons };
                self.build_hidden_block(d_in, device)
            })
            .collect();
        let output = dense_config(self.neurons, 1).init(device);

        Ok(SalesRegressor { blocks, output })
    }

    fn build_hidden_block<B: Backend>(&self, d_in: usize, device: &B::Device) -> HiddenBlock<B> {
        let dense = dense_config(d_in, self.neurons).init(device);
        // burn's momentum weights the new batch statistic: 0.01 here is a
        // 0.99 decay on the running mean/variance.
        let norm = BatchNormConfig::new(self.neurons)
            .with_momentum(0.01)
            .with_epsilon(1e-3)
            .init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        HiddenBlock { dense, norm, dropout, activation: Ignored(self.activation) }
    }
}

fn dense_config(d_in: usize, d_out: usize) -> LinearConfig {
    LinearConfig::new(d_in, d_out).with_initializer(Initializer::XavierUniform { gain: 1.0 })
}

/// dense → activation → batch-norm → dropout
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    pub dense:      Linear<B>,
    pub norm:       BatchNorm<B, 1>,
    pub dropout:    Dropout,
    pub activation: Ignored<ActivationKind>,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.dense.forward(x);
        let x = match self.activation.0 {
            ActivationKind::Relu    => activation::relu(x),
            ActivationKind::Tanh    => activation::tanh(x),
            ActivationKind::Sigmoid => activation::sigmoid(x),
        };
        // BatchNorm1d wants [batch, channels, length]; length is 1 here.
        let x = self.norm.forward(x.unsqueeze_dim::<3>(2)).squeeze::<2>(2);
        self.dropout.forward(x)
    }

    /// (inputs, units) of the dense layer
    pub fn dims(&self) -> (usize, usize) {
        let [d_in, d_out] = self.dense.weight.val().dims();
        (d_in, d_out)
    }
}

#[derive(Module, Debug)]
pub struct SalesRegressor<B: Backend> {
    pub blocks: Vec<HiddenBlock<B>>,
    pub output: Linear<B>,
}

pub struct RegressionOutput<B: Backend> {
    /// Mean squared error over the batch — shape [1]
    pub loss:    Tensor<B, 1>,
    /// Predictions — shape [batch, 1]
    pub output:  Tensor<B, 2>,
    /// Targets — shape [batch, 1]
    pub targets: Tensor<B, 2>,
}

impl<B: Backend> RegressionOutput<B> {
    /// Mean absolute error over the batch
    pub fn mae(&self) -> f64 {
        (self.output.clone() - self.targets.clone())
            .abs()
            .mean()
            .into_scalar()
            .elem::<f64>()
    }
}

impl<B: Backend> SalesRegressor<B> {
    /// features: [batch, num_features] → predictions: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = features;
        for block in &self.blocks {
            x = block.forward(x);
        }
        self.output.forward(x)
    }

    pub fn forward_regression(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 2>,
    ) -> RegressionOutput<B> {
        let output = self.forward(features);
        let loss = MseLoss::new().forward(output.clone(), targets.clone(), Reduction::Mean);
        RegressionOutput { loss, output, targets }
    }

    pub fn hidden_block_count(&self) -> usize {
        self.blocks.len()
    }

    /// One entry per layer in construction order, numbered per kind
    /// (dense, batch_normalization, dropout, dense_1, ...).
    pub fn summary(&self) -> Vec<LayerSummary> {
        let mut layers = Vec::with_capacity(self.blocks.len() * 3 + 1);

        for (i, block) in self.blocks.iter().enumerate() {
            let suffix = if i == 0 { String::new() } else { format!("_{i}") };
            let (d_in, width) = block.dims();

            layers.push(LayerSummary::new(
                format!("dense{suffix}"), "Dense", width,
                d_in * width + width, 0,
            ));
            // gamma and beta are trained; running mean and variance are not
            layers.push(LayerSummary::new(
                format!("batch_normalization{suffix}"), "BatchNormalization", width,
                2 * width, 2 * width,
            ));
            layers.push(LayerSummary::new(
                format!("dropout{suffix}"), "Dropout", width,
                0, 0,
            ));
        }

        let [d_in, _] = self.output.weight.val().dims();
        layers.push(LayerSummary::new(
            format!("dense_{}", self.blocks.len()), "Dense", 1,
            d_in + 1, 0,
        ));
        layers
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub name:                 String,
    pub kind:                 String,
    /// Output shape with the batch dimension left open, e.g. "(None, 128)"
    pub output_shape:         String,
    pub trainable_params:     usize,
    pub non_trainable_params: usize,
}

impl LayerSummary {
    fn new(
        name:          String,
        kind:          &str,
        units:         usize,
        trainable:     usize,
        non_trainable: usize,
    ) -> Self {
        Self {
            name,
            kind:                 kind.to_string(),
            output_shape:         format!("(None, {units})"),
            trainable_params:     trainable,
            non_trainable_params: non_trainable,
        }
    }

    pub fn params(&self) -> usize {
        self.trainable_params + self.non_trainable_params
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn config(layers: usize, neurons: usize) -> SalesRegressorConfig {
        SalesRegressorConfig::new(4, layers, neurons, ActivationKind::Relu, 0.3)
    }

    #[test]
    fn test_one_layer_gives_one_hidden_block() {
        let device = Default::default();
        let model = config(1, 32).init::<TestBackend>(&device).unwrap();
        assert_eq!(model.hidden_block_count(), 1);
        assert_eq!(model.summary().len(), 4);
    }

    #[test]
    fn test_five_layers_give_five_hidden_blocks() {
        let device = Default::default();
        let model = config(5, 32).init::<TestBackend>(&device).unwrap();
        assert_eq!(model.hidden_block_count(), 5);
        assert_eq!(model.summary().len(), 16);
    }

    #[test]
    fn test_out_of_range_architecture_is_config_error() {
        let device = Default::default();
        for cfg in [config(0, 32), config(6, 32), config(2, 16), config(2, 512)] {
            let err = cfg.init::<TestBackend>(&device).unwrap_err();
            assert!(matches!(err, PipelineError::Config(_)));

            // Same message the hyperparameter validation gives
            let hp = HyperparameterConfig {
                layers: cfg.layers,
                neurons: cfg.neurons,
                ..Default::default()
            };
            assert_eq!(hp.validate().unwrap_err(), err);
        }
    }

    #[test]
    fn test_empty_feature_table_is_config_error() {
        let device = Default::default();
        let cfg = SalesRegressorConfig::new(0, 1, 32, ActivationKind::Relu, 0.3);
        let err = cfg.init::<TestBackend>(&device).unwrap_err();
        assert!(err.to_string().contains("no input columns"));
    }

    #[test]
    fn test_summary_names_shapes_and_params() {
        let device = Default::default();
        let model = config(2, 32).init::<TestBackend>(&device).unwrap();
        let s = model.summary();

        let names: Vec<&str> = s.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "dense", "batch_normalization", "dropout",
                "dense_1", "batch_normalization_1", "dropout_1",
                "dense_2",
            ]
        );

        // 4 inputs * 32 + 32 biases
        assert_eq!(s[0].trainable_params, 160);
        assert_eq!(s[0].output_shape, "(None, 32)");
        // gamma + beta trainable, running mean + var not
        assert_eq!(s[1].trainable_params, 64);
        assert_eq!(s[1].non_trainable_params, 64);
        assert_eq!(s[2].params(), 0);
        // 32 * 32 + 32
        assert_eq!(s[3].trainable_params, 1056);
        // 32 * 1 + 1
        assert_eq!(s[6].trainable_params, 33);
        assert_eq!(s[6].output_shape, "(None, 1)");
    }

    #[test]
    fn test_forward_output_shape() {
        let device = Default::default();
        for activation in [ActivationKind::Relu, ActivationKind::Tanh, ActivationKind::Sigmoid] {
            let cfg = SalesRegressorConfig::new(4, 2, 32, activation, 0.0);
            let model = cfg.init::<TestBackend>(&device).unwrap();
            let x = Tensor::<TestBackend, 2>::ones([5, 4], &device);
            assert_eq!(model.forward(x).dims(), [5, 1]);
        }
    }
}
