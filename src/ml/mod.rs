// ============================================================
// Layer 5 - ML / Model Layer
// ============================================================
// All model code lives here:
//
//   encoder.rs    - one-hot encoding of genre / platform
//   tree.rs       - CART regression tree
//   forest.rs     - seeded random forest of regression trees
//   pipeline.rs   - encoder + forest as one deployable unit
//   trainer.rs    - split, fit, evaluate on the holdout
//   inferencer.rs - loads the artifact and predicts scores
//
// Reference: Breiman (2001) Random Forests
//            Rust Book §9 (Recoverable Errors with Result)

use thiserror::Error;

pub mod encoder;
pub mod tree;
pub mod forest;
pub mod pipeline;
pub mod trainer;
pub mod inferencer;

/// Failures of the encode + regress pipeline itself.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("{rows} feature rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("input does not match the training schema (missing: [{}], extra: [{}])",
        .missing.join(", "), .extra.join(", "))]
    SchemaMismatch { missing: Vec<String>, extra: Vec<String> },

    #[error("invalid input row: {0}")]
    InvalidRow(String),

    #[error("invalid model parameters: {0}")]
    InvalidParams(String),
}
