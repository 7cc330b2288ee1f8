// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (previewing the inputs or training a model).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - Only workflow coordination
//
// session.rs and pipeline.rs hold the reusable core: a prepared
// SessionContext and a pure train() that borrows it. The two
// use cases wrap them for the command line.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Data prepared once and shared by every training request
pub mod session;

// One training request → TrainResult
pub mod pipeline;

// The training workflow
pub mod train_use_case;

// The input inspection workflow
pub mod preview_use_case;
