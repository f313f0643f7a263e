// ============================================================
// Layer 3 - Report Domain Types
// ============================================================
// The request-scoped result of one analysis. Nothing here is
// persisted; the renderers in the report layer turn a Report
// into files the requester can download.

use serde::{Deserialize, Serialize};

/// Content type of the generated PDF report.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Content type of the rendered keyword cloud.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// One keyword and how often it occurred in the report text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word:  String,
    pub count: usize,
}

/// Everything shown to the user after a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub game_name:       String,
    /// Unclamped regressor output
    pub predicted_score: f64,
    pub summary:         String,
    pub unique_features: String,
    pub main_elements:   String,
    pub competitors:     Vec<String>,
    pub keywords:        Vec<Keyword>,
}

impl Report {
    /// Text the keyword cloud is built from
    pub fn keyword_source(&self) -> String {
        format!("{} {} {}", self.summary, self.unique_features, self.main_elements)
    }

    /// Competitors as one comma-separated line
    pub fn competitors_line(&self) -> String {
        self.competitors.join(", ")
    }
}

/// A generated file handed back to the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name:    String,
    pub content_type: &'static str,
    pub bytes:        Vec<u8>,
}
