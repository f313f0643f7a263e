// ============================================================
// Layer 5 - One-Hot Encoder
// ============================================================
// Turns categorical columns (genre, platform) into indicator
// vectors: one slot per category seen during fit.
//
// Example with genres [Action, RPG] and platforms [PC, PS5]:
//   ("RPG",  "PC")      → [0, 1, 1, 0]
//   ("Action", "PS5")   → [1, 0, 0, 1]
//   ("Racing", "PS5")   → [0, 0, 0, 1]   unseen genre → all zeros
//
// Categories are stored sorted, so the slot layout depends only
// on the training vocabulary and not on row order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ml::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Sorted vocabulary, one Vec per categorical column
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Learn the vocabulary of each column from `rows`.
    /// Every row must have exactly `n_columns` values.
    pub fn fit<I, R, S>(rows: I, n_columns: usize) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut seen: Vec<BTreeSet<String>> = vec![BTreeSet::new(); n_columns];

        for row in rows {
            let row = row.as_ref();
            if row.len() != n_columns {
                return Err(PipelineError::ArityMismatch {
                    expected: n_columns,
                    got:      row.len(),
                });
            }
            for (col, value) in row.iter().enumerate() {
                seen[col].insert(value.as_ref().to_string());
            }
        }

        let categories = seen.into_iter().map(|s| s.into_iter().collect()).collect();
        Ok(Self { categories })
    }

    /// Total number of indicator slots
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    /// Append the indicators for one row to `out`.
    pub fn encode_into(&self, values: &[&str], out: &mut Vec<f64>) -> Result<(), PipelineError> {
        if values.len() != self.categories.len() {
            return Err(PipelineError::ArityMismatch {
                expected: self.categories.len(),
                got:      values.len(),
            });
        }

        for (vocab, value) in self.categories.iter().zip(values) {
            let hit = vocab.binary_search_by(|c| c.as_str().cmp(value)).ok();
            out.extend((0..vocab.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
        }
        Ok(())
    }

    /// Slot names in "column=value" form
    pub fn feature_names(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .zip(&self.categories)
            .flat_map(|(col, vocab)| vocab.iter().map(move |v| format!("{col}={v}")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> OneHotEncoder {
        let rows = [["RPG", "PC"], ["Action", "PS5"], ["RPG", "PS5"]];
        OneHotEncoder::fit(rows, 2).unwrap()
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let enc = fitted();
        assert_eq!(enc.categories()[0], vec!["Action", "RPG"]);
        assert_eq!(enc.categories()[1], vec!["PC", "PS5"]);
        assert_eq!(enc.width(), 4);
    }

    #[test]
    fn test_known_values_set_one_slot_each() {
        let mut out = Vec::new();
        fitted().encode_into(&["RPG", "PC"], &mut out).unwrap();
        assert_eq!(out, vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unseen_value_is_all_zero() {
        let mut out = Vec::new();
        fitted().encode_into(&["Racing", "Switch"], &mut out).unwrap();
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let mut out = Vec::new();
        let err = fitted().encode_into(&["RPG"], &mut out).unwrap_err();
        assert!(matches!(err, PipelineError::ArityMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn test_feature_names() {
        let names = fitted().feature_names(&["genre".into(), "platform".into()]);
        assert_eq!(names, vec!["genre=Action", "genre=RPG", "platform=PC", "platform=PS5"]);
    }
}
