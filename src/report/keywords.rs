// ============================================================
// Layer 7 - Keyword Cloud
// ============================================================
// Counts the words of the report text and renders the most
// frequent ones as an SVG "word cloud".
//
// Tokenising:
//   - a word is two or more word characters (apostrophes
//     allowed inside), matched with `\w[\w']+`
//   - lowercased, trailing "'s" removed
//   - English stop words and pure numbers are skipped
//
// Ranking: count descending, then alphabetical, capped at
// MAX_WORDS.
//
// Rendering: 800×400 canvas, white background. Font size grows
// linearly with the word's count relative to the top word.
// Words are placed left to right in rows; a word that no longer
// fits on the canvas is left out.
//
// Reference: regex crate documentation

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::report::{Keyword, ReportFile, SVG_CONTENT_TYPE};

pub const MAX_WORDS: usize = 200;
pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 400;

const MIN_FONT: f64 = 12.0;
const MAX_FONT: f64 = 64.0;
const MARGIN: f64 = 10.0;
/// Rough advance width of one glyph, as a fraction of font size
const GLYPH_WIDTH: f64 = 0.6;

const PALETTE: [&str; 6] = ["#264653", "#2a9d8f", "#e9c46a", "#f4a261", "#e76f51", "#6d597a"];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w[\w']+").expect("valid word regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "few", "for", "from", "further", "had", "has", "have", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in",
        "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no",
        "nor", "not", "of", "off", "on", "once", "only", "or", "other", "ought", "our", "ours",
        "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such",
        "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
        "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
        "why", "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Count and rank the keywords of `text`.
pub fn extract_keywords(text: &str) -> Vec<Keyword> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for m in WORD_RE.find_iter(text) {
        let word = m.as_str().to_lowercase();
        let word = word.strip_suffix("'s").unwrap_or(&word).trim_matches('\'');

        if word.chars().count() < 2
            || STOP_WORDS.contains(word)
            || word.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }

    let mut keywords: Vec<Keyword> = counts
        .into_iter()
        .map(|(word, count)| Keyword { word, count })
        .collect();
    keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    keywords.truncate(MAX_WORDS);
    keywords
}

/// Lay the keywords out and return the SVG document.
pub fn render_svg(keywords: &[Keyword]) -> String {
    let width  = f64::from(CANVAS_WIDTH);
    let height = f64::from(CANVAS_HEIGHT);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CANVAS_WIDTH}\" height=\"{CANVAS_HEIGHT}\" \
         viewBox=\"0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n"
    );

    let top = keywords.first().map_or(1, |k| k.count.max(1)) as f64;

    let mut x        = MARGIN;
    let mut baseline = MARGIN;
    let mut row_max  = 0.0_f64;

    for (i, kw) in keywords.iter().enumerate() {
        let size   = MIN_FONT + (MAX_FONT - MIN_FONT) * (kw.count as f64 / top);
        let word_w = kw.word.chars().count() as f64 * size * GLYPH_WIDTH;

        if word_w > width - 2.0 * MARGIN {
            continue;
        }

        // Start a new row when the word does not fit horizontally
        if x + word_w > width - MARGIN {
            x = MARGIN;
            baseline += row_max;
            row_max = 0.0;
        }
        if row_max == 0.0 && baseline + size > height - MARGIN {
            break;
        }
        if baseline + size > height - MARGIN {
            continue;
        }

        row_max = row_max.max(size);
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"{:.1}\" fill=\"{}\">{}</text>\n",
            x,
            baseline + size,
            size,
            PALETTE[i % PALETTE.len()],
            escape_xml(&kw.word),
        ));
        x += word_w + size * 0.4;
    }

    svg.push_str("</svg>\n");
    svg
}

/// Build the downloadable keyword image for a report.
pub fn keyword_cloud_file(game_name: &str, keywords: &[Keyword]) -> ReportFile {
    ReportFile {
        file_name:    format!("{}_keywords.svg", super::safe_file_stem(game_name)),
        content_type: SVG_CONTENT_TYPE,
        bytes:        render_svg(keywords).into_bytes(),
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c    => out.push(c),
        }
    }
    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_ranks_words() {
        let kws = extract_keywords("Crafting and crafting, the CRAFTING loop! Dungeon dungeon boss.");
        assert_eq!(kws[0], Keyword { word: "crafting".into(), count: 3 });
        assert_eq!(kws[1], Keyword { word: "dungeon".into(), count: 2 });
        assert_eq!(kws[2], Keyword { word: "boss".into(), count: 1 });
        assert_eq!(kws[3], Keyword { word: "loop".into(), count: 1 });
        assert_eq!(kws.len(), 4);
    }

    #[test]
    fn test_skips_stop_words_numbers_and_single_chars() {
        let kws = extract_keywords("a I the 2025 x of and");
        assert!(kws.is_empty());
    }

    #[test]
    fn test_possessive_is_folded() {
        let kws = extract_keywords("hero's hero");
        assert_eq!(kws, vec![Keyword { word: "hero".into(), count: 2 }]);
    }

    #[test]
    fn test_unicode_words_are_kept() {
        let kws = extract_keywords("협동 전투 협동");
        assert_eq!(kws[0], Keyword { word: "협동".into(), count: 2 });
    }

    #[test]
    fn test_caps_at_max_words() {
        let text: String = (0..300).map(|i| format!("word{i} ")).collect();
        // "word0".."word299" contain digits but are not purely numeric
        assert_eq!(extract_keywords(&text).len(), MAX_WORDS);
    }

    #[test]
    fn test_svg_has_canvas_and_escapes_text() {
        let kws = vec![
            Keyword { word: "r&d".into(), count: 2 },
            Keyword { word: "pixel".into(), count: 1 },
        ];
        let svg = render_svg(&kws);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"800\" height=\"400\""));
        assert!(svg.contains("fill=\"white\""));
        assert!(svg.contains(">r&amp;d</text>"));
        assert!(svg.contains(">pixel</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_with_no_keywords_is_blank_canvas() {
        let svg = render_svg(&[]);
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_cloud_file_metadata() {
        let f = keyword_cloud_file("Star Farm", &[]);
        assert_eq!(f.file_name, "Star Farm_keywords.svg");
        assert_eq!(f.content_type, "image/svg+xml");
    }
}
