// ============================================================
// Layer 3 - Training Record and Feature Vector
// ============================================================
// The two row shapes the regression pipeline understands:
//
//   TrainingRecord - one cleaned row of the historical dataset,
//                    features plus the metacritic_score target
//   FeatureVector  - the same features without the target,
//                    i.e. what a user submits for a prediction
//
// FeatureSchema describes the column layout shared by both.
// It is stored inside the model artifact so that inference can
// refuse an artifact trained on a different layout.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// Column names, in the order the pipeline consumes them.
pub const GENRE: &str = "genre";
pub const PLATFORM: &str = "platform";
pub const USER_SCORE: &str = "user_score";
pub const RELEASE_YEAR: &str = "release_year";
pub const METACRITIC_SCORE: &str = "metacritic_score";

/// One historical game that survived cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub genre:            String,
    pub platform:         String,
    pub user_score:       f64,
    pub release_year:     i32,
    pub metacritic_score: f64,
}

impl TrainingRecord {
    /// Drop the target and keep only the model inputs
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            genre:        self.genre.clone(),
            platform:     self.platform.clone(),
            user_score:   self.user_score,
            release_year: self.release_year,
        }
    }
}

/// The inputs of a single prediction.
///
/// `deny_unknown_fields` makes JSON rows with extra keys fail,
/// and serde already rejects rows with a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureVector {
    pub genre:        String,
    pub platform:     String,
    pub user_score:   f64,
    pub release_year: i32,
}

impl FeatureVector {
    pub fn new(
        genre:        impl Into<String>,
        platform:     impl Into<String>,
        user_score:   f64,
        release_year: i32,
    ) -> Self {
        Self {
            genre:    genre.into(),
            platform: platform.into(),
            user_score,
            release_year,
        }
    }

    /// Categorical values in schema order
    pub fn categorical(&self) -> [&str; 2] {
        [self.genre.as_str(), self.platform.as_str()]
    }

    /// Numerical values in schema order, passed through unchanged
    pub fn numerical(&self) -> [f64; 2] {
        [self.user_score, f64::from(self.release_year)]
    }
}

// ─── FeatureSchema ────────────────────────────────────────────────────────────
/// Column layout of the pipeline input and target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub categorical: Vec<String>,
    pub numerical:   Vec<String>,
    pub target:      String,
}

impl FeatureSchema {
    /// The layout this binary was built against
    pub fn current() -> Self {
        Self {
            categorical: vec![GENRE.to_string(), PLATFORM.to_string()],
            numerical:   vec![USER_SCORE.to_string(), RELEASE_YEAR.to_string()],
            target:      METACRITIC_SCORE.to_string(),
        }
    }

    /// All input column names, categorical first
    pub fn feature_names(&self) -> Vec<&str> {
        self.categorical
            .iter()
            .chain(self.numerical.iter())
            .map(String::as_str)
            .collect()
    }

    /// Every column a dataset file must provide
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = self.feature_names();
        cols.push(self.target.as_str());
        cols
    }
}
