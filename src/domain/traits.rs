// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The two seams the application layer programs against:
//
//   TextExtractor   - turns an uploaded file into a Document
//                     (implemented by data::loader::DocumentLoader)
//   ScorePredictor  - turns a FeatureVector into a score
//                     (implemented by ml::pipeline::ScorePipeline)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use anyhow::Result;

use crate::domain::{document::Document, record::FeatureVector};

// ─── TextExtractor ────────────────────────────────────────────────────────────
/// Any component that can pull flat text out of a file.
pub trait TextExtractor {
    /// Extract the text of one file. Unknown formats are not an
    /// error: they yield a Document carrying the unsupported-format
    /// message.
    fn extract(&self, path: &Path) -> Result<Document>;
}

// ─── ScorePredictor ───────────────────────────────────────────────────────────
/// Any component that maps game metadata to a review score.
pub trait ScorePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}
