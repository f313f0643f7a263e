// ============================================================
// Layer 2 - PredictUseCase
// ============================================================
// Single prediction against a saved artifact, either from typed
// form values or from a JSON row keyed by column name.

use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;

use crate::domain::{record::FeatureVector, traits::ScorePredictor};
use crate::ml::inferencer::Inferencer;

/// Where the feature values come from.
#[derive(Debug, Clone)]
pub enum PredictInput {
    Features(FeatureVector),
    /// Must carry exactly the trained feature columns
    Row(Value),
}

pub struct PredictUseCase {
    model_path: PathBuf,
}

impl PredictUseCase {
    pub fn new(model_path: PathBuf) -> Self {
        Self { model_path }
    }

    pub fn execute(&self, input: &PredictInput) -> Result<f64> {
        let inferencer = Inferencer::from_artifact(&self.model_path)?;
        match input {
            PredictInput::Features(fv) => inferencer.predict(fv),
            PredictInput::Row(row)     => inferencer.predict_row(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{tests::write_dataset, TrainConfig, TrainUseCase};
    use serde_json::json;

    #[test]
    fn test_typed_and_row_inputs_agree() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            data_path:  write_dataset(dir.path()),
            model_path: dir.path().join("model.json.gz"),
            n_trees:    10,
            ..Default::default()
        };
        TrainUseCase::new(cfg.clone()).execute().unwrap();

        let uc    = PredictUseCase::new(cfg.model_path);
        let typed = uc
            .execute(&PredictInput::Features(FeatureVector::new("RPG", "PS5", 7.5, 2025)))
            .unwrap();
        let row = uc
            .execute(&PredictInput::Row(json!({
                "genre": "RPG", "platform": "PS5", "user_score": 7.5, "release_year": 2025
            })))
            .unwrap();
        assert_eq!(typed, row);

        let bad = uc.execute(&PredictInput::Row(json!({"genre": "RPG"})));
        assert!(bad.is_err());
    }

    #[test]
    fn test_missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let uc  = PredictUseCase::new(dir.path().join("nope.json.gz"));
        let err = uc
            .execute(&PredictInput::Features(FeatureVector::new("RPG", "PC", 7.0, 2020)))
            .unwrap_err();
        assert!(format!("{err:#}").contains("Have you run 'train' first?"));
    }
}
