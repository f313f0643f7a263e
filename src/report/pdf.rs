// ============================================================
// Layer 7 - PDF Report
// ============================================================
// Renders a Report into an A4 PDF using printpdf.
//
// Layout:
//   K-Critic Analysis Report - {game}        (title, 16pt)
//
//   Expected Metacritic score: 84.3
//
//   Document summary:
//   {summary, word-wrapped}
//
//   Strengths:
//   - Unique features: {..}
//   - Core systems: {..}
//
//   Competitors:
//   {comma-separated list}
//
// Lines that run past the bottom margin continue on a new page.
//
// Fonts: without a font file the built-in Helvetica is used,
// which only covers ASCII here; other characters are replaced
// with '?'. Passing a TrueType font (e.g. one with Hangul
// glyphs) embeds it and keeps the text as written.
//
// Reference: printpdf crate documentation

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{anyhow, Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::domain::report::{Report, ReportFile, PDF_CONTENT_TYPE};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 15.0;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE:  f32 = 11.0;
const LINE_H:     f32 = 6.0;

/// Characters per line for 11pt text across the printable width
pub const WRAP_COLUMNS: usize = 88;

/// Where the font for the report comes from.
#[derive(Debug, Clone, Default)]
pub enum ReportFont<'a> {
    #[default]
    Builtin,
    TrueType(&'a Path),
}

/// Title line of the report
pub fn title(report: &Report) -> String {
    format!("K-Critic Analysis Report - {}", report.game_name)
}

/// Body text, one entry per output line before wrapping.
pub fn body_lines(report: &Report) -> Vec<String> {
    let body = format!(
        "Expected Metacritic score: {:.1}\n\n\
         Document summary:\n{}\n\n\
         Strengths:\n\
         - Unique features: {}\n\
         - Core systems: {}\n\n\
         Competitors:\n{}",
        report.predicted_score,
        report.summary,
        report.unique_features,
        report.main_elements,
        report.competitors_line(),
    );
    body.lines().map(str::to_string).collect()
}

/// Render the report to PDF bytes.
pub fn render_pdf(report: &Report, font: ReportFont<'_>) -> Result<ReportFile> {
    let title_text = title(report);
    let (doc, page, layer) = PdfDocument::new(&title_text, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");

    let (font_ref, ascii_only) = match font {
        ReportFont::Builtin => (
            doc.add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| anyhow!("Cannot load built-in font: {e}"))?,
            true,
        ),
        ReportFont::TrueType(path) => {
            let file = File::open(path)
                .with_context(|| format!("Cannot open font '{}'", path.display()))?;
            let font = doc
                .add_external_font(BufReader::new(file))
                .map_err(|e| anyhow!("Cannot load font '{}': {e}", path.display()))?;
            (font, false)
        }
    };
    let prepare = |s: &str| if ascii_only { to_ascii(s) } else { s.to_string() };

    let mut writer = PageWriter {
        doc:    &doc,
        layer:  doc.get_page(page).get_layer(layer),
        font:   &font_ref,
        y:      PAGE_H - MARGIN,
        pages:  1,
    };

    // Title, roughly centred
    let title_line = prepare(&title_text);
    let title_w = title_line.chars().count() as f32 * TITLE_SIZE * 0.5 * 0.3528;
    let title_x = ((PAGE_W - title_w) / 2.0).max(MARGIN);
    writer.write(&title_line, TITLE_SIZE, title_x);
    writer.advance(LINE_H);

    for line in body_lines(report) {
        let line = prepare(&line);
        if line.trim().is_empty() {
            writer.advance(LINE_H);
            continue;
        }
        for wrapped in wrap_line(&line, WRAP_COLUMNS) {
            writer.write(&wrapped, BODY_SIZE, MARGIN);
        }
    }

    let pages = writer.pages;
    drop(writer);
    let bytes = doc
        .save_to_bytes()
        .map_err(|e| anyhow!("Cannot render PDF: {e}"))?;

    tracing::debug!("Rendered PDF report: {} page(s), {} bytes", pages, bytes.len());

    Ok(ReportFile {
        file_name:    format!("{}_report.pdf", super::safe_file_stem(&report.game_name)),
        content_type: PDF_CONTENT_TYPE,
        bytes,
    })
}

/// Tracks the cursor and starts new pages as needed.
struct PageWriter<'a> {
    doc:   &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font:  &'a IndirectFontRef,
    y:     f32,
    pages: usize,
}

impl PageWriter<'_> {
    fn write(&mut self, text: &str, size: f32, x: f32) {
        if self.y - LINE_H < MARGIN {
            self.new_page();
        }
        self.y -= LINE_H;
        self.layer.use_text(text, size, Mm(x), Mm(self.y), self.font);
    }

    fn advance(&mut self, h: f32) {
        self.y -= h;
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_W), Mm(PAGE_H), format!("Layer {}", self.pages));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN;
    }
}

/// Greedy word wrap at `width` characters. Words longer than a
/// line are split hard.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut lines   = Vec::new();
    let mut current = String::new();
    let mut len     = 0usize;

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if len > 0 {
                lines.push(std::mem::take(&mut current));
                len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if len == 0 { word.len() } else { len + 1 + word.len() };
        if needed > width && len > 0 {
            lines.push(std::mem::take(&mut current));
            len = 0;
        }
        if len > 0 {
            current.push(' ');
            len += 1;
        }
        current.extend(word.iter());
        len += word.len();
    }

    if len > 0 {
        lines.push(current);
    }
    lines
}

/// Replace anything the built-in font cannot show with '?'.
fn to_ascii(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}
