// ============================================================
// Layer 6 - Artifact Store
// ============================================================
// Saves and restores the trained pipeline as ONE file.
//
// What gets saved:
//   1. format_version - bumped whenever the layout changes
//   2. schema         - the FeatureSchema the model expects
//   3. config         - the TrainConfig used for this run
//   4. cleaning       - row counts before / after cleaning
//   5. metrics        - holdout MAE and R²
//   6. pipeline       - fitted encoder + forest
//
// On disk this is JSON, gzip-compressed (flate2). Loading parses
// the file into a JSON tree once, reads the header fields from
// it by reference, and refuses the file if the version or the
// schema differ from what this binary was built with. Only then
// is the tree converted into the typed pipeline.
//
// Default file name: metacritic_predictor.json.gz
//
// Reference: flate2 / serde_json crate documentation
//            Rust Book §9 (Error Handling)

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{bail, Context, Result};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::preprocessor::CleaningReport;
use crate::domain::record::FeatureSchema;
use crate::infra::metrics::EvalMetrics;
use crate::ml::pipeline::ScorePipeline;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;
pub const DEFAULT_ARTIFACT_PATH: &str = "metacritic_predictor.json.gz";

/// Everything the training job hands to the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub format_version: u32,
    pub schema:         FeatureSchema,
    pub config:         TrainConfig,
    pub cleaning:       CleaningReport,
    pub metrics:        EvalMetrics,
    pub pipeline:       ScorePipeline,
}

/// The fields checked before the pipeline is parsed.
#[derive(Deserialize)]
struct ArtifactHeader {
    format_version: u32,
    schema:         FeatureSchema,
}

impl ArtifactBundle {
    pub fn new(
        config:   TrainConfig,
        cleaning: CleaningReport,
        metrics:  EvalMetrics,
        pipeline: ScorePipeline,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            schema: pipeline.schema().clone(),
            config,
            cleaning,
            metrics,
            pipeline,
        }
    }
}

/// Write `bundle` to `path`, creating parent directories.
pub fn save(path: &Path, bundle: &ArtifactBundle) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Cannot create model artifact '{}'", path.display()))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, bundle)
        .with_context(|| format!("Cannot serialise model artifact '{}'", path.display()))?;
    encoder
        .finish()
        .with_context(|| format!("Cannot finish writing '{}'", path.display()))?;

    tracing::info!("Saved model artifact to '{}'", path.display());
    Ok(())
}

/// Read and validate the artifact at `path`.
pub fn load(path: &Path) -> Result<ArtifactBundle> {
    let file = File::open(path).with_context(|| {
        format!(
            "Cannot open model artifact '{}'. Have you run 'train' first?",
            path.display()
        )
    })?;

    let value: serde_json::Value = serde_json::from_reader(GzDecoder::new(BufReader::new(file)))
        .with_context(|| format!("Model artifact '{}' is unreadable or corrupt", path.display()))?;

    let header = ArtifactHeader::deserialize(&value)
        .with_context(|| format!("Model artifact '{}' has no valid header", path.display()))?;

    if header.format_version != ARTIFACT_FORMAT_VERSION {
        bail!(
            "Model artifact '{}' has format version {}, expected {}. Retrain the model.",
            path.display(),
            header.format_version,
            ARTIFACT_FORMAT_VERSION
        );
    }

    let expected = FeatureSchema::current();
    if header.schema != expected {
        bail!(
            "Model artifact '{}' was trained on features [{}], expected [{}]. Retrain the model.",
            path.display(),
            header.schema.feature_names().join(", "),
            expected.feature_names().join(", ")
        );
    }

    let bundle: ArtifactBundle = serde_json::from_value(value)
        .with_context(|| format!("Model artifact '{}' is unreadable or corrupt", path.display()))?;

    if bundle.pipeline.schema() != &bundle.schema {
        bail!("Model artifact '{}' is inconsistent: pipeline schema differs from header", path.display());
    }

    tracing::info!(
        "Loaded model artifact '{}' (holdout MAE={}, R2={})",
        path.display(),
        bundle.metrics.mae_display(),
        bundle.metrics.r2_display()
    );
    Ok(bundle)
}
