// ============================================================
// Layer 4 - Document Loader
// ============================================================
// Extracts flat text from an uploaded design document. The
// format is chosen by file extension (case-insensitive):
//
//   .pdf   → text layer of every page, via pdf-extract
//   .docx  → paragraph text, via docx-rs
//   .txt   → the file contents, decoded as UTF-8
//   other  → UNSUPPORTED_FORMAT_MESSAGE (not an error)
//
// The .docx structure in docx-rs looks like:
//   Document
//     └── children: Vec<DocumentChild>
//           └── Paragraph
//                 └── children: Vec<ParagraphChild>
//                       └── Run
//                             └── children: Vec<RunChild>
//                                   └── Text (the actual words)
//
// Extraction results are memoised for the life of the process,
// keyed by a hash of the file extension and bytes, so the same
// upload is only parsed once.
//
// Reference: docx-rs crate documentation
//            pdf-extract crate documentation
//            Rust Book §9 (Error Handling)

use std::{
    collections::{hash_map::DefaultHasher, HashMap},
    fs,
    hash::{Hash, Hasher},
    path::Path,
    sync::Mutex,
};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;

use crate::domain::document::{Document, UNSUPPORTED_FORMAT_MESSAGE};
use crate::domain::traits::TextExtractor;

static EXTRACTION_CACHE: Lazy<Mutex<HashMap<u64, String>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// The upload formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Pick a format from the path's extension, if it is supported
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf"  => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt"  => Some(DocumentFormat::PlainText),
            _      => None,
        }
    }
}

/// Extracts text from PDF, Word and plain-text uploads.
#[derive(Debug, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DocumentLoader {
    fn extract(&self, path: &Path) -> Result<Document> {
        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let Some(format) = DocumentFormat::from_path(path) else {
            tracing::warn!("Unsupported upload format: '{}'", path.display());
            return Ok(Document::new(source, UNSUPPORTED_FORMAT_MESSAGE));
        };

        let bytes = fs::read(path)
            .with_context(|| format!("Cannot read uploaded file '{}'", path.display()))?;

        let text = extract_cached(format, &bytes)
            .with_context(|| format!("Cannot extract text from '{}'", path.display()))?;

        tracing::debug!("Extracted {} chars from '{}'", text.len(), source);
        Ok(Document::new(source, text))
    }
}

fn cache_key(format: DocumentFormat, bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    format.hash(&mut hasher);
    bytes.hash(&mut hasher);
    hasher.finish()
}

fn extract_cached(format: DocumentFormat, bytes: &[u8]) -> Result<String> {
    let key = cache_key(format, bytes);

    if let Some(hit) = lock_cache()?.get(&key) {
        tracing::debug!("Extraction cache hit");
        return Ok(hit.clone());
    }

    // Parse outside the lock; a duplicate parse on a race is harmless
    let text = extract_bytes(format, bytes)?;
    lock_cache()?.insert(key, text.clone());
    Ok(text)
}

fn lock_cache() -> Result<std::sync::MutexGuard<'static, HashMap<u64, String>>> {
    EXTRACTION_CACHE
        .lock()
        .map_err(|_| anyhow!("extraction cache lock poisoned"))
}

/// Extract text from raw file bytes of a known format.
pub fn extract_bytes(format: DocumentFormat, bytes: &[u8]) -> Result<String> {
    match format {
        DocumentFormat::PlainText => String::from_utf8(bytes.to_vec())
            .context("Plain-text upload is not valid UTF-8"),
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow!("pdf-extract error: {e}"))?;

    // Keep the non-empty page lines, joined with newlines
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();
    Ok(lines.join("\n"))
}

fn extract_docx(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| anyhow!("docx-rs parse error: {:?}", e))?;

    let mut paragraphs: Vec<String> = Vec::new();

    for child in &docx.document.children {
        use docx_rs::DocumentChild;

        // Only Paragraph nodes carry body text (not tables, images, etc.)
        if let DocumentChild::Paragraph(para) = child {
            paragraphs.push(extract_paragraph_text(para));
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Paragraph → Run → Text. Runs are parts of the same sentence,
/// so they are concatenated with no separator.
fn extract_paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut parts = Vec::new();

    for child in &para.children {
        use docx_rs::ParagraphChild;

        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                use docx_rs::RunChild;

                if let RunChild::Text(t) = rc {
                    parts.push(t.text.clone());
                }
            }
        }
    }

    parts.join("")
}
