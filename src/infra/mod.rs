// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by both the training job and
// the report app:
//
//   artifact.rs    - the single gzip model file: save, load,
//                    version and schema validation
//
//   model_cache.rs - load-once, share-forever access to
//                    artifacts within one process
//
//   metrics.rs     - holdout MAE / R² and the CSV log with one
//                    row per training run
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Model artifact saving and loading
pub mod artifact;

/// Process-lifetime model cache
pub mod model_cache;

/// Evaluation metrics and training-run CSV log
pub mod metrics;
