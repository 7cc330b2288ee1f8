// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that name the concepts
// of the system: tables, hyperparameters, training history and
// the errors a run can end with.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - polars appears only as the DataFrame a TableSource yields
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Pipeline error kinds
pub mod error;

// Per-epoch loss / MAE records
pub mod history;

// User-tunable network and optimizer settings
pub mod hyperparams;

// Encoded feature columns and the target
pub mod features;

// Core abstractions (traits) that other layers implement
pub mod traits;
