// ============================================================
// Layer 2 - ReportUseCase
// ============================================================
// Handles one submitted analysis form:
//
//   Step 0: No document uploaded?  → warn and stop here
//   Step 1: Extract document text  (Layer 4 - data)
//   Step 2: Summarise it           (Layer 4 - data)
//   Step 3: Load the model, cached (Layer 5 - ml)
//   Step 4: Predict the score      (Layer 5 - ml)
//   Step 5: Assemble the Report    (Layer 3 - domain)
//   Step 6: Keyword cloud + PDF    (Layer 7 - report)
//   Step 7: Write both files       (out_dir)
//
// Any failing step aborts the request with its error. An
// unsupported upload is not a failure: its "text" is the
// unsupported-format message, which flows through like any
// other document.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::data::{loader::DocumentLoader, summarizer::summarize};
use crate::domain::{
    report::{Report, ReportFile},
    submission::GameSubmission,
    traits::{ScorePredictor, TextExtractor},
};
use crate::ml::inferencer::Inferencer;
use crate::report::{
    keywords::{extract_keywords, keyword_cloud_file},
    pdf::{render_pdf, ReportFont},
};

pub const MISSING_DOCUMENT_WARNING: &str = "Please upload a design document first.";

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub model_path: PathBuf,
    pub out_dir:    PathBuf,
    /// TrueType font for the PDF; the built-in font otherwise
    pub font_path:  Option<PathBuf>,
}

/// A finished report and where its files were written.
#[derive(Debug, Clone)]
pub struct CompletedReport {
    pub report:   Report,
    pub pdf_path: PathBuf,
    pub svg_path: PathBuf,
}

#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// Nothing was processed
    MissingDocument,
    Completed(Box<CompletedReport>),
}

pub struct ReportUseCase {
    config:    ReportConfig,
    extractor: Box<dyn TextExtractor>,
}

impl ReportUseCase {
    pub fn new(config: ReportConfig) -> Self {
        Self::with_extractor(config, Box::new(DocumentLoader::new()))
    }

    pub fn with_extractor(config: ReportConfig, extractor: Box<dyn TextExtractor>) -> Self {
        Self { config, extractor }
    }

    pub fn execute(&self, submission: &GameSubmission) -> Result<ReportOutcome> {
        // ── Step 0: The upload gate ───────────────────────────────────────────
        let Some(document_path) = submission.document.as_deref() else {
            tracing::warn!("{}", MISSING_DOCUMENT_WARNING);
            return Ok(ReportOutcome::MissingDocument);
        };

        tracing::info!(
            "Analysing '{}' ({}, {}, {}, {}h, audience: {})",
            submission.game_name,
            submission.genre,
            submission.platform,
            submission.play_mode,
            submission.play_time_hours,
            submission.target_audience
        );

        // ── Steps 1-2: Extract and summarise ──────────────────────────────────
        let document = self.extractor.extract(document_path)?;
        if document.is_unsupported() {
            tracing::warn!("'{}' is not a PDF, Word or text file", document.source);
        }
        let summary = summarize(&document.text);

        // ── Steps 3-4: Predict ────────────────────────────────────────────────
        let inferencer = Inferencer::from_artifact(&self.config.model_path)?;
        let predicted_score = inferencer.predict(&submission.feature_vector())?;
        tracing::info!("Predicted score {:.1} for '{}'", predicted_score, submission.game_name);

        // ── Step 5: Report ────────────────────────────────────────────────────
        let mut report = Report {
            game_name:       submission.game_name.clone(),
            predicted_score,
            summary,
            unique_features: submission.unique_features.clone(),
            main_elements:   submission.main_elements.clone(),
            competitors:     submission.competitor_list(),
            keywords:        Vec::new(),
        };
        report.keywords = extract_keywords(&report.keyword_source());

        // ── Steps 6-7: Render and write ───────────────────────────────────────
        let font = match &self.config.font_path {
            Some(p) => ReportFont::TrueType(p.as_path()),
            None    => ReportFont::Builtin,
        };
        let svg = keyword_cloud_file(&report.game_name, &report.keywords);
        let pdf = render_pdf(&report, font)?;

        fs::create_dir_all(&self.config.out_dir).with_context(|| {
            format!("Cannot create output directory '{}'", self.config.out_dir.display())
        })?;
        let svg_path = write_file(&self.config.out_dir, &svg)?;
        let pdf_path = write_file(&self.config.out_dir, &pdf)?;

        Ok(ReportOutcome::Completed(Box::new(CompletedReport { report, pdf_path, svg_path })))
    }
}

fn write_file(dir: &Path, file: &ReportFile) -> Result<PathBuf> {
    let path = dir.join(&file.file_name);
    fs::write(&path, &file.bytes)
        .with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::info!("Wrote {} ({}, {} bytes)", path.display(), file.content_type, file.bytes.len());
    Ok(path)
}
