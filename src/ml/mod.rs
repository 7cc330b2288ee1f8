// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The network, the loop that trains it and the code that scores it.
//
// What's in this layer:
//
//   model.rs     — Feed-forward regressor
//                  1–5 hidden blocks, each:
//                  • Dense (Xavier-uniform init)
//                  • Activation (relu / tanh / sigmoid)
//                  • Batch normalisation
//                  • Dropout
//                  followed by a single linear output unit
//
//   trainer.rs   — The training loop
//                  Mini-batches of 64, MSE loss, one optimizer
//                  step per batch, validation after every epoch,
//                  aborts on a non-finite loss
//
//   evaluator.rs — Test-split predictions, MSE / MAE / R²,
//                  and the series behind every chart
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Ioffe & Szegedy (2015) Batch Normalization

/// Feed-forward sales regressor
pub mod model;

/// Training loop with per-epoch validation
pub mod trainer;

/// Test metrics and chart data
pub mod evaluator;
