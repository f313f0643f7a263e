// ============================================================
// Layer 4 - Summarizer
// ============================================================
// Placeholder summary: the first SUMMARY_CHARS characters of
// the extracted text followed by an ellipsis. The ellipsis is
// always appended, even when the text was shorter than the
// limit and nothing was cut.
//
// Counting is by char, not byte, so multi-byte text (Korean
// design docs, emoji) is never split mid-character.

pub const SUMMARY_CHARS: usize = 500;
pub const ELLIPSIS: &str = "...";

pub fn summarize(text: &str) -> String {
    let mut summary: String = text.chars().take(SUMMARY_CHARS).collect();
    summary.push_str(ELLIPSIS);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_gets_ellipsis() {
        assert_eq!(summarize("short pitch"), "short pitch...");
    }

    #[test]
    fn test_long_text_is_cut_at_limit() {
        let text    = "a".repeat(1200);
        let summary = summarize(&text);
        assert_eq!(summary.chars().count(), SUMMARY_CHARS + ELLIPSIS.len());
        assert!(summary.ends_with("a..."));
    }

    #[test]
    fn test_multibyte_text_cut_by_chars() {
        let text    = "게".repeat(600);
        let summary = summarize(&text);
        assert_eq!(summary, format!("{}...", "게".repeat(500)));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(summarize(""), "...");
    }
}
