// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on `clap`.
// All business logic is delegated to Layer 2 (application);
// this layer parses, routes and prints.
//
// Three commands are supported:
//   1. `train`   - fits the model on a CSV and saves the artifact
//   2. `predict` - one score from typed flags or a JSON row
//   3. `report`  - the analysis form: document in, PDF + SVG out
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, PredictArgs, ReportArgs, TrainArgs};

use crate::application::{
    predict_use_case::{PredictInput, PredictUseCase},
    report_use_case::{ReportOutcome, ReportUseCase, MISSING_DOCUMENT_WARNING},
    train_use_case::TrainUseCase,
};
use crate::domain::record::FeatureVector;
use crate::report::text::render_text;

#[derive(Parser, Debug)]
#[command(
    name = "k-critic",
    version = "0.1.0",
    about = "Predict a game's Metacritic score and build a design-document report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Report(args)  => run_report(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training on '{}'", args.data.display());

    let summary = TrainUseCase::new(args.into()).execute()?;

    if summary.cleaning.dropped > 0 {
        println!("Dropped rows: {}", summary.cleaning.dropped);
    }
    println!("MAE: {}", summary.metrics.mae_display());
    println!("R2 Score: {}", summary.metrics.r2_display());
    println!("Model saved: {}", summary.model_path.display());
    println!("Run logged: {}", summary.run_log.display());
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let input = match args.row {
        Some(json) => {
            let row = serde_json::from_str(&json).context("--row is not valid JSON")?;
            PredictInput::Row(row)
        }
        None => {
            // clap guarantees all four flags when --row is absent
            let (Some(genre), Some(platform), Some(user_score), Some(release_year)) =
                (args.genre, args.platform, args.user_score, args.release_year)
            else {
                anyhow::bail!("--genre, --platform, --user-score and --release-year are required");
            };
            PredictInput::Features(FeatureVector::new(genre, platform, user_score, release_year))
        }
    };

    let score = PredictUseCase::new(args.model).execute(&input)?;
    println!("Expected Metacritic score: {score:.1}");
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<()> {
    let (config, submission) = args.into_parts();

    match ReportUseCase::new(config).execute(&submission)? {
        ReportOutcome::MissingDocument => {
            println!("{MISSING_DOCUMENT_WARNING}");
        }
        ReportOutcome::Completed(done) => {
            println!("{}", render_text(&done.report));
            println!("PDF report: {}", done.pdf_path.display());
            println!("Keyword cloud: {}", done.svg_path.display());
        }
    }
    Ok(())
}
