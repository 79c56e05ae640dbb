//! Common utility functions shared across the codebase.

/// Normalize language codes given on the command line.
///
/// Codes are trimmed, empty entries dropped and duplicates removed while the
/// first occurrence keeps its position.
///
/// # Examples
///
/// ```
/// use convoglot::utils::parse_languages;
///
/// let raw = vec![" fr".to_string(), "".to_string(), "de".to_string(), "fr".to_string()];
/// assert_eq!(parse_languages(&raw), vec!["fr", "de"]);
/// ```
pub fn parse_languages(raw: &[String]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::with_capacity(raw.len());
    for code in raw.iter().map(|code| code.trim()) {
        if !code.is_empty() && !languages.iter().any(|seen| seen == code) {
            languages.push(code.to_string());
        }
    }
    languages
}
