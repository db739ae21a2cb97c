//! String sanitization utilities for output file names

/// Replace filesystem-unsafe characters with underscores
///
/// Preserves alphanumeric characters, hyphens, underscores, and dots.
/// Path separators never survive, so the result is a single path segment.
pub fn sanitize_for_filename(input: &str) -> String {
    let sanitized: String = input
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' => c,
            _ => '_',
        })
        .collect();

    // "." and ".." would name a directory
    if sanitized.chars().all(|c| c == '.') {
        sanitized.replace('.', "_")
    } else {
        sanitized
    }
}

/// `<country>_<repository>.json`, both parts sanitized
pub fn record_file_name(country: &str, repository: &str) -> String {
    format!(
        "{}_{}.json",
        sanitize_for_filename(country),
        sanitize_for_filename(repository)
    )
}
