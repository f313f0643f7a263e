// ============================================================
// Layer 4 - Record Cleaner
// ============================================================
// Turns raw CSV rows into typed TrainingRecords.
//
// A row is dropped when any of the five required cells is
// missing, or when a numeric cell does not parse as a finite
// number. Every other row is kept, in its original order.
//
// Cleaning steps per row:
//   1. genre / platform must be present (non-empty)
//   2. user_score, release_year, metacritic_score must parse
//      as finite f64 values
//   3. release_year is rounded to the nearest whole year
//
// The number of dropped rows is logged and returned, so a bad
// export never shrinks the training set unnoticed.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

use serde::{Deserialize, Serialize};

use crate::data::dataset::RawRow;
use crate::domain::record::TrainingRecord;

/// Row counts before and after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub total:   usize,
    pub kept:    usize,
    pub dropped: usize,
}

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Coerce every row, dropping the ones that fail.
    pub fn clean(&self, rows: &[RawRow]) -> (Vec<TrainingRecord>, CleaningReport) {
        let records: Vec<TrainingRecord> = rows.iter().filter_map(coerce_row).collect();

        let report = CleaningReport {
            total:   rows.len(),
            kept:    records.len(),
            dropped: rows.len() - records.len(),
        };

        if report.dropped > 0 {
            tracing::warn!(
                "Dropped {} of {} rows with missing or non-numeric values",
                report.dropped,
                report.total
            );
        } else {
            tracing::info!("All {} rows passed cleaning", report.total);
        }

        (records, report)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn coerce_row(row: &RawRow) -> Option<TrainingRecord> {
    let genre    = non_empty(row.genre.as_deref())?;
    let platform = non_empty(row.platform.as_deref())?;

    let user_score       = parse_number(row.user_score.as_deref())?;
    let release_year     = parse_number(row.release_year.as_deref())?;
    let metacritic_score = parse_number(row.metacritic_score.as_deref())?;

    // Guard the cast; a year outside i32 is garbage anyway
    let release_year = release_year.round();
    if release_year.abs() > f64::from(i32::MAX) {
        return None;
    }

    Some(TrainingRecord {
        genre,
        platform,
        user_score,
        release_year: release_year as i32,
        metacritic_score,
    })
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a numeric cell. "NaN", "inf" and friends count as missing.
fn parse_number(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
