// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the report directory:
//
//   report.rs   — Writes train_config.json and summary.json,
//                 and drives the other two writers for a run.
//
//   metrics.rs  — Per-epoch history as history.csv
//                 (csv crate, serde field names as header).
//
//   charts.rs   — Five SVG charts drawn with plotters:
//                 loss, MAE, predicted vs actual, residuals
//                 and the sales distributions.
//
// Nothing in here computes a number; the ml layer hands over
// finished series and this layer only formats and writes them.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Config / summary JSON and the run report
pub mod report;

/// Training history CSV logger
pub mod metrics;

/// SVG chart rendering
pub mod charts;
