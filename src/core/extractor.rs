use regex::Regex;
use std::sync::OnceLock;

// ASCII word characters plus hyphen, then a literal ".sql", anchored on ASCII
// word boundaries. Case-insensitive only for ASCII letters.
const SQL_FILENAME_PATTERN: &str = r"(?i-u)\b[A-Za-z0-9_-]+\.sql\b";

fn sql_filename_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(SQL_FILENAME_PATTERN).expect("filename pattern compiles"))
}

/// Extract every `.sql` filename referenced in `text`.
///
/// Matches are returned in order of occurrence with their original casing.
/// Duplicates are kept.
pub fn extract(text: &str) -> Vec<String> {
    let filenames: Vec<String> = sql_filename_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    log::debug!("extracted {} sql filename(s) from {} byte(s)", filenames.len(), text.len());
    filenames
}

/// Newline-separated listing of extracted filenames.
pub fn listing(filenames: &[String]) -> String {
    filenames.join("\n")
}
