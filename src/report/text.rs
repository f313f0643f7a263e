// ============================================================
// Layer 7 - On-Screen Report
// ============================================================
// Plain-text rendering of a Report for the terminal, in the
// same section order as the PDF.

use std::fmt;

use crate::domain::report::Report;

/// How many keywords to list on screen
pub const SHOWN_KEYWORDS: usize = 15;

/// Terminal view of a Report.
pub struct ReportText<'a>(pub &'a Report);

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "K-Critic evaluation report: {}", r.game_name)?;
        writeln!(f, "Expected Metacritic score: {:.1}", r.predicted_score)?;
        writeln!(f)?;
        writeln!(f, "Document summary")?;
        writeln!(f, "{}", r.summary)?;
        writeln!(f)?;
        writeln!(f, "Strengths")?;
        writeln!(f, "- Unique features: {}", r.unique_features)?;
        writeln!(f, "- Core systems: {}", r.main_elements)?;
        writeln!(f)?;
        writeln!(f, "Competitors")?;
        writeln!(f, "{}", r.competitors_line())?;

        if !r.keywords.is_empty() {
            let top: Vec<String> = r
                .keywords
                .iter()
                .take(SHOWN_KEYWORDS)
                .map(|k| format!("{} ({})", k.word, k.count))
                .collect();
            writeln!(f)?;
            writeln!(f, "Top keywords")?;
            writeln!(f, "{}", top.join(", "))?;
        }
        Ok(())
    }
}

pub fn render_text(report: &Report) -> String {
    ReportText(report).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::Keyword;

    #[test]
    fn test_sections_and_score_format() {
        let report = Report {
            game_name:       "Star Farm".into(),
            predicted_score: 71.25,
            summary:         "Farming in orbit...".into(),
            unique_features: "Zero-g crops".into(),
            main_elements:   "Crafting".into(),
            competitors:     vec!["Stardew Valley".into()],
            keywords:        vec![Keyword { word: "crops".into(), count: 2 }],
        };
        let text = render_text(&report);
        assert!(text.contains("Expected Metacritic score: 71.2"));
        assert!(text.contains("- Unique features: Zero-g crops"));
        assert!(text.contains("Stardew Valley"));
        assert!(text.contains("crops (2)"));
    }

    #[test]
    fn test_keyword_section_only_when_keywords_exist() {
        let report = Report {
            game_name:       "Quiet".into(),
            predicted_score: 50.0,
            summary:         String::new(),
            unique_features: String::new(),
            main_elements:   String::new(),
            competitors:     Vec::new(),
            keywords:        Vec::new(),
        };
        let text = render_text(&report);
        assert!(text.starts_with("K-Critic evaluation report: Quiet\n"));
        assert!(!text.contains("Top keywords"));
    }
}
