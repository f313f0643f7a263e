// ============================================================
// Layer 3 - Document Domain Type
// ============================================================
// The flat text pulled out of an uploaded design document,
// together with the file name it came from. By the time a
// Document exists the PDF / Word / plain-text format is gone.

use serde::{Deserialize, Serialize};

/// Message used in place of extracted text for unknown formats.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str = "Unsupported file format.";

/// Text extracted from one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The file name, kept so reports can say what was analysed
    pub source: String,

    /// The full extracted text. For unsupported formats this is
    /// UNSUPPORTED_FORMAT_MESSAGE, not an error.
    pub text: String,
}

impl Document {
    /// Example:
    ///   let doc = Document::new("pitch.txt", "A cozy farming sim...");
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text:   text.into(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        self.text == UNSUPPORTED_FORMAT_MESSAGE
    }
}
