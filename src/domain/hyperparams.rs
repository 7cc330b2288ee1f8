// ============================================================
// Layer 3 — Hyperparameter Configuration
// ============================================================
// Everything the user can tune before pressing "train".
// Each field has a fixed legal domain:
//
//   layers         1 – 5
//   neurons        32 – 256
//   activation     relu | tanh | sigmoid
//   dropout        0.0 – 0.5
//   optimizer      adam | sgd | rmsprop
//   learning_rate  0.0001 – 0.01
//   epochs         10 – 100
//
// validate() is the single place these ranges are enforced.
// The enums parse from the same lowercase names the CLI and
// the JSON config use.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

pub const LAYER_RANGE: RangeInclusive<usize> = 1..=5;
pub const NEURON_RANGE: RangeInclusive<usize> = 32..=256;
pub const DROPOUT_RANGE: RangeInclusive<f64> = 0.0..=0.5;
pub const LEARNING_RATE_RANGE: RangeInclusive<f64> = 0.0001..=0.01;
pub const EPOCH_RANGE: RangeInclusive<usize> = 10..=100;

/// Nonlinearity applied after every hidden dense layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationKind {
    Relu,
    Tanh,
    Sigmoid,
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivationKind::Relu => "relu",
            ActivationKind::Tanh => "tanh",
            ActivationKind::Sigmoid => "sigmoid",
        };
        f.write_str(name)
    }
}

impl FromStr for ActivationKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> PipelineResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "relu" => Ok(ActivationKind::Relu),
            "tanh" => Ok(ActivationKind::Tanh),
            "sigmoid" => Ok(ActivationKind::Sigmoid),
            other => Err(PipelineError::config(format!(
                "unknown activation '{other}' (expected relu, tanh or sigmoid)"
            ))),
        }
    }
}

/// Weight-update rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    Adam,
    Sgd,
    RmsProp,
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptimizerKind::Adam => "adam",
            OptimizerKind::Sgd => "sgd",
            OptimizerKind::RmsProp => "rmsprop",
        };
        f.write_str(name)
    }
}

impl FromStr for OptimizerKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> PipelineResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "adam" => Ok(OptimizerKind::Adam),
            "sgd" => Ok(OptimizerKind::Sgd),
            "rmsprop" => Ok(OptimizerKind::RmsProp),
            other => Err(PipelineError::config(format!(
                "unknown optimizer '{other}' (expected adam, sgd or rmsprop)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterConfig {
    pub layers:        usize,
    pub neurons:       usize,
    pub activation:    ActivationKind,
    pub dropout:       f64,
    pub optimizer:     OptimizerKind,
    pub learning_rate: f64,
    pub epochs:        usize,
}

impl Default for HyperparameterConfig {
    fn default() -> Self {
        Self {
            layers:        3,
            neurons:       128,
            activation:    ActivationKind::Relu,
            dropout:       0.3,
            optimizer:     OptimizerKind::Adam,
            learning_rate: 0.001,
            epochs:        50,
        }
    }
}

impl HyperparameterConfig {
    /// Check every field against its legal domain.
    pub fn validate(&self) -> PipelineResult<()> {
        check_architecture(self.layers, self.neurons)?;

        if !DROPOUT_RANGE.contains(&self.dropout) {
            return Err(PipelineError::config(format!(
                "dropout rate {} outside {:?}",
                self.dropout, DROPOUT_RANGE
            )));
        }
        if !LEARNING_RATE_RANGE.contains(&self.learning_rate) {
            return Err(PipelineError::config(format!(
                "learning rate {} outside {:?}",
                self.learning_rate, LEARNING_RATE_RANGE
            )));
        }
        if !EPOCH_RANGE.contains(&self.epochs) {
            return Err(PipelineError::config(format!(
                "epoch count {} outside {:?}",
                self.epochs, EPOCH_RANGE
            )));
        }
        Ok(())
    }
}

/// Layer and width bounds, shared by config validation and the model builder.
pub fn check_architecture(layers: usize, neurons: usize) -> PipelineResult<()> {
    if !LAYER_RANGE.contains(&layers) {
        return Err(PipelineError::config(format!(
            "hidden-layer count {layers} outside {LAYER_RANGE:?}"
        )));
    }
    if !NEURON_RANGE.contains(&neurons) {
        return Err(PipelineError::config(format!(
            "neurons per layer {neurons} outside {NEURON_RANGE:?}"
        )));
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(HyperparameterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_range_edges_are_accepted() {
        let cfg = HyperparameterConfig {
            layers: 5,
            neurons: 32,
            dropout: 0.5,
            learning_rate: 0.0001,
            epochs: 100,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields_are_config_errors() {
        let bad = [
            HyperparameterConfig { layers: 0, ..Default::default() },
            HyperparameterConfig { layers: 6, ..Default::default() },
            HyperparameterConfig { neurons: 31, ..Default::default() },
            HyperparameterConfig { neurons: 257, ..Default::default() },
            HyperparameterConfig { dropout: 0.6, ..Default::default() },
            HyperparameterConfig { learning_rate: 0.1, ..Default::default() },
            HyperparameterConfig { epochs: 9, ..Default::default() },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(PipelineError::Config(_))), "{cfg:?}");
        }
    }

    #[test]
    fn test_enums_parse_case_insensitively() {
        assert_eq!("ReLU".parse::<ActivationKind>().unwrap(), ActivationKind::Relu);
        assert_eq!("rmsprop".parse::<OptimizerKind>().unwrap(), OptimizerKind::RmsProp);
        assert!("swish".parse::<ActivationKind>().is_err());
    }

    #[test]
    fn test_json_uses_lowercase_names() {
        let json = serde_json::to_string(&HyperparameterConfig::default()).unwrap();
        assert!(json.contains("\"relu\""));
        assert!(json.contains("\"adam\""));
    }
}
