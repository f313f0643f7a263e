// ============================================================
// Layer 7 - Report Rendering
// ============================================================
// Turns a Report into things a person can read or download:
//
//   keywords.rs - word counts and the SVG keyword cloud
//   pdf.rs      - the downloadable PDF report
//   text.rs     - the on-screen summary printed by the CLI

pub mod keywords;
pub mod pdf;
pub mod text;

/// A file-name-safe version of the game name; "untitled" when blank.
pub fn safe_file_stem(game_name: &str) -> String {
    let stem: String = game_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "untitled".to_string()
    } else {
        stem
    }
}
