// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `predict` and `report`
// and all their configurable flags.
//
// The `report` flags are the analysis form: one flag per field,
// with the same bounds and defaults. clap rejects out-of-range
// values before any use case runs.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::{report_use_case::ReportConfig, train_use_case::TrainConfig};
use crate::domain::submission::{
    GameSubmission, Platform, PlayMode, DEFAULT_PLAY_TIME, DEFAULT_RELEASE_YEAR,
    DEFAULT_USER_SCORE, PLAY_TIME_RANGE, RELEASE_YEAR_RANGE, USER_SCORE_RANGE,
};
use crate::infra::artifact::DEFAULT_ARTIFACT_PATH;

/// Environment variable that overrides the artifact path
pub const MODEL_ENV: &str = "K_CRITIC_MODEL";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the score regressor on a CSV of past games
    Train(TrainArgs),

    /// Predict one score from a saved model
    Predict(PredictArgs),

    /// Analyse a design document and write the PDF + keyword cloud
    Report(ReportArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV with genre, platform, user_score, release_year, metacritic_score
    #[arg(long, default_value = "metacritic_data.csv")]
    pub data: PathBuf,

    /// Where to write the trained artifact
    #[arg(long, env = MODEL_ENV, default_value = DEFAULT_ARTIFACT_PATH)]
    pub model_out: PathBuf,

    /// Fraction of rows held out for MAE / R²
    #[arg(long, default_value_t = 0.2, value_parser = parse_fraction)]
    pub test_size: f64,

    /// Seed for the holdout shuffle and the bootstrap draws
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub n_trees: u32,
}

/// Boundary between Layer 1 and Layer 2: the application layer
/// never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:  a.data,
            model_path: a.model_out,
            test_size:  a.test_size,
            seed:       a.seed,
            n_trees:    a.n_trees as usize,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long, env = MODEL_ENV, default_value = DEFAULT_ARTIFACT_PATH)]
    pub model: PathBuf,

    #[arg(long, required_unless_present = "row")]
    pub genre: Option<String>,

    #[arg(long, required_unless_present = "row")]
    pub platform: Option<String>,

    #[arg(long, required_unless_present = "row", value_parser = parse_user_score)]
    pub user_score: Option<f64>,

    #[arg(long, required_unless_present = "row")]
    pub release_year: Option<i32>,

    /// A JSON object keyed by column name, instead of the flags above
    #[arg(long, conflicts_with_all = ["genre", "platform", "user_score", "release_year"])]
    pub row: Option<String>,
}

/// All arguments for the `report` command: the analysis form
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[arg(long, env = MODEL_ENV, default_value = DEFAULT_ARTIFACT_PATH)]
    pub model: PathBuf,

    /// Design document (.pdf, .docx or .txt)
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Directory for the PDF report and keyword cloud
    #[arg(long, default_value = "reports")]
    pub out_dir: PathBuf,

    /// TrueType font to embed in the PDF (needed for non-ASCII text)
    #[arg(long)]
    pub font: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub game_name: String,

    #[arg(long, default_value = "")]
    pub genre: String,

    /// PC, PS5, Xbox, Switch or Mobile
    #[arg(long, default_value = "PC")]
    pub platform: Platform,

    /// Single, Multi or Single+Multi
    #[arg(long, default_value = "Single")]
    pub play_mode: PlayMode,

    /// Expected play time in hours (1-100)
    #[arg(
        long,
        default_value_t = DEFAULT_PLAY_TIME,
        value_parser = clap::value_parser!(u32)
            .range(i64::from(PLAY_TIME_RANGE.0)..=i64::from(PLAY_TIME_RANGE.1)),
    )]
    pub play_time: u32,

    /// Expected user score (1.0-10.0)
    #[arg(long, default_value_t = DEFAULT_USER_SCORE, value_parser = parse_user_score)]
    pub user_score: f64,

    /// Release year (2000-2030)
    #[arg(
        long,
        default_value_t = DEFAULT_RELEASE_YEAR,
        value_parser = clap::value_parser!(i32)
            .range(i64::from(RELEASE_YEAR_RANGE.0)..=i64::from(RELEASE_YEAR_RANGE.1)),
    )]
    pub release_year: i32,

    #[arg(long, default_value = "")]
    pub target_audience: String,

    /// Comma-separated competitor titles
    #[arg(long, default_value = "")]
    pub competitors: String,

    #[arg(long, default_value = "")]
    pub unique_features: String,

    #[arg(long, default_value = "")]
    pub main_elements: String,
}

impl ReportArgs {
    /// Split the flags into the use-case config and the form value
    pub fn into_parts(self) -> (ReportConfig, GameSubmission) {
        let config = ReportConfig {
            model_path: self.model,
            out_dir:    self.out_dir,
            font_path:  self.font,
        };
        let submission = GameSubmission {
            game_name:       self.game_name,
            genre:           self.genre,
            platform:        self.platform,
            play_mode:       self.play_mode,
            play_time_hours: self.play_time,
            user_score:      self.user_score,
            release_year:    self.release_year,
            target_audience: self.target_audience,
            competitors:     self.competitors,
            unique_features: self.unique_features,
            main_elements:   self.main_elements,
            document:        self.document,
        };
        (config, submission)
    }
}

fn parse_fraction(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if v > 0.0 && v < 1.0 {
        Ok(v)
    } else {
        Err(format!("{v} must be strictly between 0 and 1"))
    }
}

fn parse_user_score(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    let (lo, hi) = USER_SCORE_RANGE;
    if (lo..=hi).contains(&v) {
        Ok(v)
    } else {
        Err(format!("{v} is outside {lo:.1}-{hi:.1}"))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("k-critic").chain(args.iter().copied()))
    }

    #[test]
    fn test_train_defaults() {
        let cli = parse(&["train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.test_size, 0.2);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.n_trees, 100);
    }

    #[test]
    fn test_report_form_bounds_are_enforced() {
        assert!(parse(&["report", "--play-time", "0"]).is_err());
        assert!(parse(&["report", "--play-time", "101"]).is_err());
        assert!(parse(&["report", "--user-score", "10.5"]).is_err());
        assert!(parse(&["report", "--release-year", "1999"]).is_err());
        assert!(parse(&["report", "--release-year", "2031"]).is_err());
        assert!(parse(&["report", "--play-time", "100", "--release-year", "2030"]).is_ok());
        assert!(parse(&["report", "--platform", "Dreamcast"]).is_err());
        assert!(parse(&["report", "--play-mode", "Single+Multi", "--platform", "ps5"]).is_ok());
    }

    #[test]
    fn test_report_form_defaults() {
        let cli = parse(&["report", "--game-name", "Star Farm"]).unwrap();
        let Commands::Report(args) = cli.command else { panic!("expected report") };
        let (_, sub) = args.into_parts();
        assert_eq!(sub.play_time_hours, DEFAULT_PLAY_TIME);
        assert_eq!(sub.user_score, DEFAULT_USER_SCORE);
        assert_eq!(sub.release_year, DEFAULT_RELEASE_YEAR);
        assert!(sub.document.is_none());
    }

    #[test]
    fn test_predict_needs_flags_or_row() {
        assert!(parse(&["predict"]).is_err());
        assert!(parse(&["predict", "--row", "{}"]).is_ok());
        assert!(parse(&[
            "predict", "--genre", "RPG", "--platform", "PC",
            "--user-score", "7.5", "--release-year", "2025",
        ])
        .is_ok());
    }
}
