// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the offline training job in order:
//
//   Step 1: Read the dataset CSV        (Layer 4 - data)
//   Step 2: Clean / coerce the rows     (Layer 4 - data)
//   Step 3: Split, fit and evaluate     (Layer 5 - ml)
//   Step 4: Save the artifact           (Layer 6 - infra)
//   Step 5: Append to the run log       (Layer 6 - infra)
//
// The holdout metrics are diagnostic. They are logged, returned
// and stored in the artifact, but never gate the save.
//
// Reference: Rust Book §13 (Iterators and Closures)

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{dataset::load_raw_rows, preprocessor::{CleaningReport, Preprocessor}};
use crate::infra::{
    artifact::{self, ArtifactBundle, DEFAULT_ARTIFACT_PATH},
    metrics::{EvalMetrics, RunLogger, TrainingRun},
};
use crate::ml::{
    forest::{ForestParams, DEFAULT_N_TREES, DEFAULT_SEED},
    trainer::train_and_evaluate,
};

pub const DEFAULT_DATA_PATH: &str = "metacritic_data.csv";
pub const DEFAULT_TEST_SIZE: f64  = 0.2;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a training run. Serialisable because a copy is
// stored inside the artifact next to the fitted pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:  PathBuf,
    pub model_path: PathBuf,
    /// Fraction of cleaned rows held out for evaluation
    pub test_size:  f64,
    /// Drives both the holdout shuffle and the forest's bootstrap draws
    pub seed:       u64,
    pub n_trees:    usize,
}

impl TrainConfig {
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            seed:    self.seed,
            ..Default::default()
        }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:  PathBuf::from(DEFAULT_DATA_PATH),
            model_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            test_size:  DEFAULT_TEST_SIZE,
            seed:       DEFAULT_SEED,
            n_trees:    DEFAULT_N_TREES,
        }
    }
}

/// What a finished training run reports back to the CLI.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub model_path: PathBuf,
    pub run_log:    PathBuf,
    pub cleaning:   CleaningReport,
    pub metrics:    EvalMetrics,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the whole training job end to end
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Read the dataset ──────────────────────────────────────────
        tracing::info!("Loading dataset from '{}'", cfg.data_path.display());
        let rows = load_raw_rows(&cfg.data_path)?;

        // ── Step 2: Clean ─────────────────────────────────────────────────────
        let (records, cleaning) = Preprocessor::new().clean(&rows);
        tracing::info!(
            "Cleaning kept {} of {} rows ({} dropped)",
            cleaning.kept,
            cleaning.total,
            cleaning.dropped
        );
        if records.is_empty() {
            bail!(
                "No usable rows in '{}' after cleaning ({} dropped)",
                cfg.data_path.display(),
                cleaning.dropped
            );
        }

        // ── Step 3: Split, fit, evaluate ──────────────────────────────────────
        let outcome = train_and_evaluate(records, cfg)?;

        // ── Step 4: Save the artifact ─────────────────────────────────────────
        let bundle = ArtifactBundle::new(cfg.clone(), cleaning, outcome.metrics, outcome.pipeline);
        artifact::save(&cfg.model_path, &bundle)?;

        // ── Step 5: Run log, next to the artifact ─────────────────────────────
        let log_dir = cfg
            .model_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let logger = RunLogger::new(&log_dir)?;
        logger.log(&TrainingRun {
            seed:         cfg.seed,
            n_trees:      cfg.n_trees,
            dropped_rows: cleaning.dropped,
            metrics:      outcome.metrics,
        })?;

        Ok(TrainSummary {
            model_path: cfg.model_path.clone(),
            run_log:    logger.csv_path().to_path_buf(),
            cleaning,
            metrics:    outcome.metrics,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{record::FeatureVector, traits::ScorePredictor};
    use crate::ml::inferencer::Inferencer;
    use std::{fmt::Write as _, fs, path::Path};

    /// 100 rows over 3 genres and 2 platforms, plus one broken row.
    pub(crate) fn write_dataset(dir: &Path) -> PathBuf {
        let genres    = ["Action", "RPG", "Puzzle"];
        let platforms = ["PC", "PS5"];

        let mut csv = String::from("genre,platform,user_score,release_year,metacritic_score\n");
        for i in 0..100 {
            let g = i % 3;
            let p = i % 2;
            let user_score = 4.0 + (i % 6) as f64;
            let score      = 35.0 + 5.0 * user_score + 4.0 * g as f64 + 2.0 * p as f64;
            writeln!(
                csv,
                "{},{},{},{},{}",
                genres[g],
                platforms[p],
                user_score,
                2005 + (i % 15),
                score
            )
            .unwrap();
        }
        csv.push_str("RPG,PC,tbd,2019,80\n");

        let path = dir.join("games.csv");
        fs::write(&path, csv).unwrap();
        path
    }

    fn config(dir: &Path) -> TrainConfig {
        TrainConfig {
            data_path:  write_dataset(dir),
            model_path: dir.join("models/metacritic_predictor.json.gz"),
            n_trees:    20,
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end_train_then_predict() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = config(dir.path());
        let summary = TrainUseCase::new(cfg.clone()).execute().unwrap();

        assert!(cfg.model_path.exists());
        assert_eq!(summary.cleaning.dropped, 1);
        assert_eq!(summary.metrics.test_rows, 20);
        assert_eq!(summary.metrics.train_rows, 80);

        let log = fs::read_to_string(&summary.run_log).unwrap();
        assert_eq!(log.lines().count(), 2);

        let inferencer = Inferencer::from_artifact(&cfg.model_path).unwrap();
        let score = inferencer
            .predict(&FeatureVector::new("Action", "PC", 7.5, 2025))
            .unwrap();
        assert!(score.is_finite());
    }

    #[test]
    fn test_same_seed_gives_identical_metrics() {
        let a_dir = tempfile::tempdir().unwrap();
        let b_dir = tempfile::tempdir().unwrap();
        let a = TrainUseCase::new(config(a_dir.path())).execute().unwrap();
        let b = TrainUseCase::new(config(b_dir.path())).execute().unwrap();

        assert!(a.metrics.mae.is_some());
        assert_eq!(a.metrics.mae, b.metrics.mae);
        assert_eq!(a.metrics.r2, b.metrics.r2);
    }

    #[test]
    fn test_dataset_without_usable_rows_fails() {
        let dir  = tempfile::tempdir().unwrap();
        let data = dir.path().join("bad.csv");
        fs::write(&data, "genre,platform,user_score,release_year,metacritic_score\nRPG,PC,tbd,2019,80\n").unwrap();

        let cfg = TrainConfig {
            data_path:  data,
            model_path: dir.path().join("m.json.gz"),
            ..Default::default()
        };
        let err = TrainUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(err.to_string().contains("No usable rows"));
        assert!(!cfg.model_path.exists());
    }
}
