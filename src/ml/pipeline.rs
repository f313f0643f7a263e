// ============================================================
// Layer 5 - Score Pipeline
// ============================================================
// The deployable unit: a fitted OneHotEncoder plus a fitted
// RandomForestRegressor, bound to the FeatureSchema they were
// trained on.
//
// Encoded row layout (numerical columns pass through unchanged):
//
//   [ genre indicators | platform indicators | user_score | release_year ]
//
// The encoder vocabulary comes only from the records given to
// fit(), which is the training split. Unseen categories at
// predict time encode to all-zero indicators.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    record::{FeatureSchema, FeatureVector, TrainingRecord},
    traits::ScorePredictor,
};
use crate::ml::{
    encoder::OneHotEncoder,
    forest::{ForestParams, RandomForestRegressor},
    PipelineError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePipeline {
    schema:  FeatureSchema,
    encoder: OneHotEncoder,
    forest:  RandomForestRegressor,
}

impl ScorePipeline {
    /// Fit encoder and forest on `records`.
    pub fn fit(records: &[TrainingRecord], params: &ForestParams) -> Result<Self, PipelineError> {
        if records.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }

        let schema  = FeatureSchema::current();
        let encoder = OneHotEncoder::fit(
            records.iter().map(|r| [r.genre.as_str(), r.platform.as_str()]),
            schema.categorical.len(),
        )?;

        let x = records
            .iter()
            .map(|r| encode(&encoder, &r.features()))
            .collect::<Result<Vec<_>, _>>()?;
        let y: Vec<f64> = records.iter().map(|r| r.metacritic_score).collect();

        let forest = RandomForestRegressor::fit(&x, &y, params)?;

        let pipeline = Self { schema, encoder, forest };
        let columns  = pipeline.encoded_feature_names();
        tracing::info!(
            "Pipeline fitted: {} rows, {} encoded features, {} trees",
            records.len(),
            columns.len(),
            pipeline.forest.n_trees()
        );
        tracing::debug!("Encoded columns: {}", columns.join(", "));

        Ok(pipeline)
    }

    /// Predict one score. The result is not clamped to any range.
    pub fn predict_one(&self, features: &FeatureVector) -> Result<f64, PipelineError> {
        let row = encode(&self.encoder, features)?;
        Ok(self.forest.predict(&row))
    }

    /// Predict from a loosely typed row (a JSON object keyed by
    /// column name). The keys must match the trained schema
    /// exactly: no missing and no extra columns.
    pub fn predict_row(&self, row: &Value) -> Result<f64, PipelineError> {
        let obj = row
            .as_object()
            .ok_or_else(|| PipelineError::InvalidRow("expected a JSON object".into()))?;

        let expected = self.schema.feature_names();
        let missing: Vec<String> = expected
            .iter()
            .filter(|c| !obj.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        let extra: Vec<String> = obj
            .keys()
            .filter(|k| !expected.contains(&k.as_str()))
            .cloned()
            .collect();

        if !missing.is_empty() || !extra.is_empty() {
            return Err(PipelineError::SchemaMismatch { missing, extra });
        }

        let features: FeatureVector = serde_json::from_value(row.clone())
            .map_err(|e| PipelineError::InvalidRow(e.to_string()))?;
        self.predict_one(&features)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// "column=value" for each categorical value of `features` that
    /// was never seen in training (it encodes to all zeros)
    pub fn unseen_categories(&self, features: &FeatureVector) -> Vec<String> {
        self.schema
            .categorical
            .iter()
            .zip(self.encoder.categories())
            .zip(features.categorical())
            .filter(|((_, vocab), value)| vocab.binary_search_by(|c| c.as_str().cmp(value)).is_err())
            .map(|((col, _), value)| format!("{col}={value}"))
            .collect()
    }

    /// Names of every encoded column, in row order
    pub fn encoded_feature_names(&self) -> Vec<String> {
        let mut names = self.encoder.feature_names(&self.schema.categorical);
        names.extend(self.schema.numerical.iter().cloned());
        names
    }
}

impl ScorePredictor for ScorePipeline {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64> {
        Ok(self.predict_one(features)?)
    }
}

fn encode(encoder: &OneHotEncoder, features: &FeatureVector) -> Result<Vec<f64>, PipelineError> {
    let mut row = Vec::with_capacity(encoder.width() + 2);
    encoder.encode_into(&features.categorical(), &mut row)?;
    row.extend(features.numerical());
    Ok(row)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<TrainingRecord> {
        let genres    = ["Action", "RPG", "Puzzle"];
        let platforms = ["PC", "PS5"];
        (0..60)
            .map(|i| {
                let g = i % 3;
                let p = i % 2;
                let user_score = 5.0 + (i % 5) as f64;
                TrainingRecord {
                    genre:            genres[g].to_string(),
                    platform:         platforms[p].to_string(),
                    user_score,
                    release_year:     2010 + (i % 10) as i32,
                    metacritic_score: 40.0 + 5.0 * user_score + 3.0 * g as f64 + p as f64,
                }
            })
            .collect()
    }

    fn fitted() -> ScorePipeline {
        let params = ForestParams { n_trees: 20, ..Default::default() };
        ScorePipeline::fit(&records(), &params).unwrap()
    }

    #[test]
    fn test_in_vocabulary_prediction_is_finite() {
        let p = fitted();
        for genre in ["Action", "RPG", "Puzzle"] {
            for platform in ["PC", "PS5"] {
                let score = p.predict_one(&FeatureVector::new(genre, platform, 7.5, 2025)).unwrap();
                assert!(score.is_finite());
            }
        }
    }

    #[test]
    fn test_unseen_category_still_predicts() {
        let p = fitted();
        let score = p
            .predict_one(&FeatureVector::new("Racing", "Switch", 7.5, 2025))
            .unwrap();
        assert!(score.is_finite());
    }

    #[test]
    fn test_unseen_categories_are_named() {
        let p = fitted();
        assert!(p.unseen_categories(&FeatureVector::new("RPG", "PC", 7.5, 2025)).is_empty());
        assert_eq!(
            p.unseen_categories(&FeatureVector::new("Racing", "PC", 7.5, 2025)),
            vec!["genre=Racing"]
        );
    }

    #[test]
    fn test_encoded_layout() {
        let p = fitted();
        assert_eq!(
            p.encoded_feature_names(),
            vec![
                "genre=Action", "genre=Puzzle", "genre=RPG",
                "platform=PC", "platform=PS5",
                "user_score", "release_year",
            ]
        );
    }

    #[test]
    fn test_vocabulary_comes_from_fit_records_only() {
        let mut recs = records();
        recs.retain(|r| r.genre != "Puzzle");
        let p = ScorePipeline::fit(&recs, &ForestParams { n_trees: 5, ..Default::default() }).unwrap();
        assert_eq!(p.encoder.categories()[0], vec!["Action", "RPG"]);
    }

    #[test]
    fn test_predict_row_matches_typed_prediction() {
        let p     = fitted();
        let typed = p.predict_one(&FeatureVector::new("RPG", "PC", 8.0, 2020)).unwrap();
        let row   = json!({"genre": "RPG", "platform": "PC", "user_score": 8.0, "release_year": 2020});
        assert_eq!(p.predict_row(&row).unwrap(), typed);
    }

    #[test]
    fn test_predict_row_schema_mismatch() {
        let p   = fitted();
        let row = json!({"genre": "RPG", "platform": "PC", "user_score": 8.0, "price": 60});
        match p.predict_row(&row).unwrap_err() {
            PipelineError::SchemaMismatch { missing, extra } => {
                assert_eq!(missing, vec!["release_year"]);
                assert_eq!(extra, vec!["price"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_predict_row_rejects_non_object() {
        assert!(matches!(
            fitted().predict_row(&json!([1, 2, 3])),
            Err(PipelineError::InvalidRow(_))
        ));
    }

    #[test]
    fn test_empty_records_rejected() {
        assert!(matches!(
            ScorePipeline::fit(&[], &ForestParams::default()),
            Err(PipelineError::EmptyTrainingSet)
        ));
    }
}
