// ============================================================
// Layer 4 - Dataset Reader
// ============================================================
// Reads the historical games spreadsheet (CSV with a header
// row) into raw, still-untyped rows.
//
// Only the five columns named by the FeatureSchema are kept;
// any other column in the file is ignored. Cells are trimmed
// by the csv reader and an empty cell becomes None. Rows with
// fewer cells than the header are accepted here (the missing
// cells are None) so that the cleaning step can drop and count
// them instead of the whole read failing.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use std::{fs::File, io::Read, path::Path};

use anyhow::{bail, Context, Result};

use crate::domain::record::FeatureSchema;

/// One dataset row before type coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub genre:            Option<String>,
    pub platform:         Option<String>,
    pub user_score:       Option<String>,
    pub release_year:     Option<String>,
    pub metacritic_score: Option<String>,
}

/// Read every data row of the CSV file at `path`.
pub fn load_raw_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open dataset '{}'", path.display()))?;
    let rows = read_raw_rows(file)
        .with_context(|| format!("Cannot parse dataset '{}'", path.display()))?;
    tracing::info!("Read {} rows from '{}'", rows.len(), path.display());
    Ok(rows)
}

/// Read raw rows from any CSV source.
pub fn read_raw_rows<R: Read>(source: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    // Map each required column name to its position in the header
    let headers = reader.headers()?.clone();
    let schema  = FeatureSchema::current();
    let mut idx = Vec::with_capacity(5);
    let mut missing = Vec::new();

    for col in schema.required_columns() {
        match headers.iter().position(|h| h == col) {
            Some(i) => idx.push(i),
            None    => missing.push(col),
        }
    }
    if !missing.is_empty() {
        bail!("Dataset is missing required column(s): {}", missing.join(", "));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |i: usize| -> Option<String> {
            record
                .get(i)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        rows.push(RawRow {
            genre:            cell(idx[0]),
            platform:         cell(idx[1]),
            user_score:       cell(idx[2]),
            release_year:     cell(idx[3]),
            metacritic_score: cell(idx[4]),
        });
    }

    Ok(rows)
}
