// ============================================================
// Layer 3 - Game Submission
// ============================================================
// Everything a user fills in for one analysis request, as a
// single immutable value. The report workflow receives this
// struct and nothing else, so there is no hidden session state.
//
// The enumerated choices and numeric bounds mirror the input
// form: platform and play mode are closed sets, play time,
// user score and release year have fixed ranges.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::record::FeatureVector;

pub const PLAY_TIME_RANGE:    (u32, u32) = (1, 100);
pub const USER_SCORE_RANGE:   (f64, f64) = (1.0, 10.0);
pub const RELEASE_YEAR_RANGE: (i32, i32) = (2000, 2030);

pub const DEFAULT_PLAY_TIME:    u32 = 10;
pub const DEFAULT_USER_SCORE:   f64 = 7.5;
pub const DEFAULT_RELEASE_YEAR: i32 = 2025;

// ─── Platform ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Pc,
    Ps5,
    Xbox,
    Switch,
    Mobile,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Pc,
        Platform::Ps5,
        Platform::Xbox,
        Platform::Switch,
        Platform::Mobile,
    ];

    /// The label used in the dataset's platform column
    pub fn label(self) -> &'static str {
        match self {
            Platform::Pc     => "PC",
            Platform::Ps5    => "PS5",
            Platform::Xbox   => "Xbox",
            Platform::Switch => "Switch",
            Platform::Mobile => "Mobile",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown platform '{s}' (expected one of PC, PS5, Xbox, Switch, Mobile)")
            })
    }
}

// ─── PlayMode ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    Single,
    Multi,
    SingleAndMulti,
}

impl PlayMode {
    pub fn label(self) -> &'static str {
        match self {
            PlayMode::Single         => "Single",
            PlayMode::Multi          => "Multi",
            PlayMode::SingleAndMulti => "Single+Multi",
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single"                        => Ok(PlayMode::Single),
            "multi"                         => Ok(PlayMode::Multi),
            "single+multi" | "single-multi" => Ok(PlayMode::SingleAndMulti),
            _ => Err(format!(
                "unknown play mode '{s}' (expected Single, Multi or Single+Multi)"
            )),
        }
    }
}

// ─── GameSubmission ───────────────────────────────────────────────────────────
/// One filled-in analysis form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSubmission {
    pub game_name:       String,
    pub genre:           String,
    pub platform:        Platform,
    pub play_mode:       PlayMode,
    pub play_time_hours: u32,
    pub user_score:      f64,
    pub release_year:    i32,
    pub target_audience: String,
    /// Comma-delimited, exactly as typed
    pub competitors:     String,
    pub unique_features: String,
    pub main_elements:   String,
    /// The uploaded design document, if any
    pub document:        Option<PathBuf>,
}

impl GameSubmission {
    /// The subset of the form the regressor consumes
    pub fn feature_vector(&self) -> FeatureVector {
        FeatureVector::new(
            self.genre.clone(),
            self.platform.label(),
            self.user_score,
            self.release_year,
        )
    }

    /// Competitor names split on commas, blanks removed
    pub fn competitor_list(&self) -> Vec<String> {
        self.competitors
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for GameSubmission {
    fn default() -> Self {
        Self {
            game_name:       String::new(),
            genre:           String::new(),
            platform:        Platform::Pc,
            play_mode:       PlayMode::Single,
            play_time_hours: DEFAULT_PLAY_TIME,
            user_score:      DEFAULT_USER_SCORE,
            release_year:    DEFAULT_RELEASE_YEAR,
            target_audience: String::new(),
            competitors:     String::new(),
            unique_features: String::new(),
            main_elements:   String::new(),
            document:        None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse_is_case_insensitive() {
        assert_eq!("ps5".parse::<Platform>().unwrap(), Platform::Ps5);
        assert_eq!(" Switch ".parse::<Platform>().unwrap(), Platform::Switch);
        assert!("Dreamcast".parse::<Platform>().is_err());
    }

    #[test]
    fn test_play_mode_parse() {
        assert_eq!("Single+Multi".parse::<PlayMode>().unwrap(), PlayMode::SingleAndMulti);
        assert_eq!("multi".parse::<PlayMode>().unwrap(), PlayMode::Multi);
        assert!("co-op".parse::<PlayMode>().is_err());
    }

    #[test]
    fn test_competitor_list_skips_blanks() {
        let s = GameSubmission {
            competitors: "Hades, , Dead Cells,Celeste ".into(),
            ..Default::default()
        };
        assert_eq!(s.competitor_list(), vec!["Hades", "Dead Cells", "Celeste"]);
    }

    #[test]
    fn test_feature_vector_uses_platform_label() {
        let s = GameSubmission {
            genre: "Roguelike".into(),
            platform: Platform::Xbox,
            ..Default::default()
        };
        let fv = s.feature_vector();
        assert_eq!(fv.platform, "Xbox");
        assert_eq!(fv.user_score, DEFAULT_USER_SCORE);
        assert_eq!(fv.release_year, DEFAULT_RELEASE_YEAR);
    }
}
