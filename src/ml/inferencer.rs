// ============================================================
// Layer 5 - Inferencer
// ============================================================
// Prediction side of the artifact. The bundle is fetched from
// the process-wide model cache, so constructing any number of
// Inferencers for the same path reads the file only once.

use std::{path::Path, sync::Arc};

use anyhow::Result;
use serde_json::Value;

use crate::domain::{record::FeatureVector, traits::ScorePredictor};
use crate::infra::{artifact::ArtifactBundle, model_cache};

pub struct Inferencer {
    bundle: Arc<ArtifactBundle>,
}

impl Inferencer {
    /// Load (or reuse) the artifact at `path`.
    pub fn from_artifact(path: &Path) -> Result<Self> {
        let bundle = model_cache::get_or_load(path)?;
        tracing::debug!(
            "Inferencer ready: {} trees, trained on {} rows",
            bundle.config.n_trees,
            bundle.metrics.train_rows
        );
        Ok(Self { bundle })
    }

    /// Predict from a JSON object keyed by column name
    pub fn predict_row(&self, row: &Value) -> Result<f64> {
        Ok(self.bundle.pipeline.predict_row(row)?)
    }
}

impl ScorePredictor for Inferencer {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let unseen = self.bundle.pipeline.unseen_categories(features);
        if !unseen.is_empty() {
            tracing::warn!("Not seen in training, encoded as all zeros: {}", unseen.join(", "));
        }
        let score = self.bundle.pipeline.predict_one(features)?;
        tracing::debug!("Predicted {:.3} for {:?}", score, features);
        Ok(score)
    }
}
