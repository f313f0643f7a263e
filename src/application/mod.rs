// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one user-facing goal (training, predicting, reporting).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The offline training job
pub mod train_use_case;

// One prediction against a saved artifact
pub mod predict_use_case;

// The analysis form: document + metadata → report files
pub mod report_use_case;
