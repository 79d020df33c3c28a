//! Deterministic text canonicalization.
//!
//! Three steps, each total and side-effect free: lower-case, collapse
//! whitespace runs (spaces, tabs, newlines) to single spaces and trim, strip
//! punctuation. Output ordering matches input ordering exactly.

/// Normalize one raw text.
///
/// Punctuation means anything that is not alphanumeric, underscore, or
/// whitespace — the `[^\w\s]` class the embedding model was prepared with.
///
/// # Example
///
/// ```
/// use response_atlas_core::normalize::clean_text;
///
/// assert_eq!(clean_text("  It's GREAT!\t(really)\n"), "its great really");
/// ```
pub fn clean_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();

    // Strip punctuation first so "it's" collapses to "its" rather than
    // leaving a stray space behind.
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut out = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Normalize a whole column, index-preserving.
///
/// Missing values are handed in as empty strings by the table layer and pass
/// through as empty strings; they are never a failure.
pub fn clean_column(raw: &[String]) -> Vec<String> {
    raw.iter().map(|t| clean_text(t)).collect()
}
