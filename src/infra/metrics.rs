// ============================================================
// Layer 6 - Metrics and Training-Run Log
// ============================================================
// Holdout metrics for the regressor and a CSV log with one row
// per training run.
//
//   MAE = mean(|y - ŷ|)
//   R²  = 1 - SS_res / SS_tot
//
// Both are None when the holdout is too small to define them
// (no rows for MAE, fewer than two rows for R²).
//
// Output file: training_runs.csv, next to the model artifact.
//
// Example CSV output:
//   seed,n_trees,train_rows,test_rows,dropped_rows,mae,r2
//   42,100,80,20,3,4.812500,0.613201
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

pub const RUN_LOG_FILE: &str = "training_runs.csv";

/// Holdout quality of one trained pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub mae:        Option<f64>,
    pub r2:         Option<f64>,
    pub train_rows: usize,
    pub test_rows:  usize,
}

impl EvalMetrics {
    pub fn mae_display(&self) -> String {
        fmt_metric(self.mae)
    }

    pub fn r2_display(&self) -> String {
        fmt_metric(self.r2)
    }
}

fn fmt_metric(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Mean absolute error. None for empty input.
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let total: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
    Some(total / y_true.len() as f64)
}

/// Coefficient of determination.
///
/// With fewer than two samples R² is undefined (None). A constant
/// target gives 1.0 for a perfect prediction and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.len() < 2 || y_true.len() != y_pred.len() {
        return None;
    }
    let mean   = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}

/// One row of the training-run log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingRun {
    pub seed:         u64,
    pub n_trees:      usize,
    pub dropped_rows: usize,
    pub metrics:      EvalMetrics,
}

/// Appends training runs to a CSV file.
pub struct RunLogger {
    csv_path: PathBuf,
}

impl RunLogger {
    /// Log into `dir`/training_runs.csv, writing the header when new.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;

        let csv_path = dir.join(RUN_LOG_FILE);
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "seed,n_trees,train_rows,test_rows,dropped_rows,mae,r2")?;
            tracing::debug!("Created run log '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, run: &TrainingRun) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open run log '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{},{},{},{}",
            run.seed,
            run.n_trees,
            run.metrics.train_rows,
            run.metrics.test_rows,
            run.dropped_rows,
            csv_metric(run.metrics.mae),
            csv_metric(run.metrics.r2),
        )?;

        tracing::debug!("Logged training run to '{}'", self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Undefined metrics are written as empty cells
fn csv_metric(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.6}")).unwrap_or_default()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mae() {
        assert_eq!(mean_absolute_error(&[1.0, 2.0, 3.0], &[2.0, 2.0, 1.0]), Some(1.0));
        assert_eq!(mean_absolute_error(&[], &[]), None);
    }

    #[test]
    fn test_r2_perfect_and_mean_predictor() {
        let y = [60.0, 70.0, 80.0];
        assert_eq!(r2_score(&y, &y), Some(1.0));
        assert_eq!(r2_score(&y, &[70.0, 70.0, 70.0]), Some(0.0));
    }

    #[test]
    fn test_r2_constant_target() {
        assert_eq!(r2_score(&[5.0, 5.0], &[5.0, 5.0]), Some(1.0));
        assert_eq!(r2_score(&[5.0, 5.0], &[4.0, 5.0]), Some(0.0));
        assert_eq!(r2_score(&[5.0], &[5.0]), None);
    }

    #[test]
    fn test_run_log_appends_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = RunLogger::new(dir.path()).unwrap();
        let run    = TrainingRun {
            seed:         42,
            n_trees:      100,
            dropped_rows: 3,
            metrics:      EvalMetrics { mae: Some(4.8125), r2: Some(0.5), train_rows: 80, test_rows: 20 },
        };
        logger.log(&run).unwrap();
        RunLogger::new(dir.path()).unwrap().log(&run).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "seed,n_trees,train_rows,test_rows,dropped_rows,mae,r2");
        assert_eq!(lines[1], "42,100,80,20,3,4.812500,0.500000");
    }

    #[test]
    fn test_undefined_metrics_display() {
        let m = EvalMetrics { mae: Some(3.14159), r2: None, train_rows: 1, test_rows: 1 };
        assert_eq!(m.mae_display(), "3.14");
        assert_eq!(m.r2_display(), "n/a");
    }
}
