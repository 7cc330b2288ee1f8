// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// The three ways a pipeline run can fail:
//
//   Parse          — bad or incomplete input tables. Raised by the
//                    loader and the preprocessor; no session exists
//                    afterwards.
//   Config         — a hyperparameter outside its legal range.
//   NumericFailure — a non-finite loss during training. Only the
//                    current training attempt is lost.
//
// Outer layers wrap these in anyhow::Error with `?`. Data frame
// errors from polars surface as Parse.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("training diverged at epoch {epoch}: loss = {loss}")]
    NumericFailure { epoch: usize, loss: f64 },
}

impl PipelineError {
    pub fn parse(msg: impl Into<String>) -> Self {
        PipelineError::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        PipelineError::Config(msg.into())
    }
}

impl From<polars::error::PolarsError> for PipelineError {
    fn from(err: polars::error::PolarsError) -> Self {
        PipelineError::Parse(err.to_string())
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
