//! Text normalization shared by every catalog entity.
//!
//! Names arrive from imports, spreadsheets, and hand-typed filter boxes with
//! stray padding and doubled spaces. Everything that is displayed or compared
//! goes through [`normalize_text`] first.

/// Trim the ends and collapse every internal whitespace run to one space.
///
/// Idempotent: `normalize_text(&normalize_text(x)) == normalize_text(x)`.
///
/// ```
/// use bookshelf_catalog::normalize_text;
///
/// assert_eq!(normalize_text("  Learning   Python \t"), "Learning Python");
/// assert_eq!(normalize_text(""), "");
/// ```
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Comparison key: normalized and lower-cased.
pub fn normalize_key(text: &str) -> String {
    normalize_text(text).to_lowercase()
}
