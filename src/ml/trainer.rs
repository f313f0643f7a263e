// ============================================================
// Layer 5 - Trainer
// ============================================================
// One-shot batch fit:
//
//   cleaned records
//       │
//       ▼
//   split_train_test(test_size, seed)
//       │
//       ├── train split → ScorePipeline::fit
//       │
//       └── holdout     → predict → MAE, R²
//
// The metrics are diagnostic only. A poor holdout score never
// stops the pipeline from being returned (and saved).

use anyhow::{bail, Result};

use crate::application::train_use_case::TrainConfig;
use crate::data::splitter::split_train_test;
use crate::domain::record::TrainingRecord;
use crate::infra::metrics::{mean_absolute_error, r2_score, EvalMetrics};
use crate::ml::pipeline::ScorePipeline;

/// A fitted pipeline together with its holdout scores.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub pipeline: ScorePipeline,
    pub metrics:  EvalMetrics,
}

pub fn train_and_evaluate(records: Vec<TrainingRecord>, cfg: &TrainConfig) -> Result<TrainOutcome> {
    let (train, test) = split_train_test(records, cfg.test_size, cfg.seed);
    tracing::info!("Split: {} train, {} holdout", train.len(), test.len());
    if train.is_empty() {
        bail!(
            "Training split is empty: all {} cleaned row(s) went to the holdout (test_size {}). \
             Add more rows or lower --test-size.",
            test.len(),
            cfg.test_size
        );
    }

    let pipeline = ScorePipeline::fit(&train, &cfg.forest_params())?;

    let y_true: Vec<f64> = test.iter().map(|r| r.metacritic_score).collect();
    let y_pred: Vec<f64> = test
        .iter()
        .map(|r| pipeline.predict_one(&r.features()))
        .collect::<Result<_, _>>()?;

    let metrics = EvalMetrics {
        mae:        mean_absolute_error(&y_true, &y_pred),
        r2:         r2_score(&y_true, &y_pred),
        train_rows: train.len(),
        test_rows:  test.len(),
    };

    if metrics.mae.is_none() || metrics.r2.is_none() {
        tracing::warn!("Holdout split has {} rows; some metrics are undefined", test.len());
    }
    tracing::info!("Holdout MAE={} R2={}", metrics.mae_display(), metrics.r2_display());
    Ok(TrainOutcome { pipeline, metrics })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn record(i: usize) -> TrainingRecord {
        TrainingRecord {
            genre:            "RPG".into(),
            platform:         "PC".into(),
            user_score:       5.0 + i as f64,
            release_year:     2015,
            metacritic_score: 60.0 + i as f64,
        }
    }

    #[test]
    fn test_single_row_reports_empty_training_split() {
        let err = train_and_evaluate(vec![record(0)], &TrainConfig::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Training split is empty"));
        assert!(msg.contains("all 1 cleaned row(s)"));
    }

    #[test]
    fn test_two_rows_train_with_undefined_r2() {
        let cfg = TrainConfig { n_trees: 3, ..Default::default() };
        let outcome = train_and_evaluate(vec![record(0), record(1)], &cfg).unwrap();
        assert_eq!(outcome.metrics.train_rows, 1);
        assert_eq!(outcome.metrics.test_rows, 1);
        assert!(outcome.metrics.mae.is_some());
        assert!(outcome.metrics.r2.is_none());
    }
}
