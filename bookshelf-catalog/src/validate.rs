//! Field-level validation rules.
//!
//! Every validator returns the full list of violations instead of stopping
//! at the first one, so a form or import report can show them all at once.
//! An empty list means the value is acceptable.

use crate::types::{Book, MAX_RATING};

/// File extensions accepted as catalog documents (lower-case, no dot).
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "epub", "djvu", "mobi", "azw3"];

const MAX_NAME_LEN: usize = 100;
const MAX_FILE_NAME_LEN: usize = 255;
const MAX_TITLE_LEN: usize = 500;

/// True if `file_name` ends in one of [`DOCUMENT_EXTENSIONS`] (case-insensitive).
pub fn has_document_extension(file_name: &str) -> bool {
    let lower = file_name.trim().to_lowercase();
    DOCUMENT_EXTENSIONS
        .iter()
        .any(|ext| lower.len() > ext.len() + 1 && lower.ends_with(&format!(".{ext}")))
}

pub fn validate_category(name: &str) -> Vec<String> {
    let mut errors = Vec::new();
    check_name("Category", name, &mut errors);
    errors
}

pub fn validate_subject(name: &str, category_id: Option<i64>) -> Vec<String> {
    let mut errors = Vec::new();
    check_name("Subject", name, &mut errors);
    check_id("Category ID", category_id, &mut errors);
    errors
}

pub fn validate_book(book: &Book) -> Vec<String> {
    let mut errors = Vec::new();
    let title = book.title.trim();
    let file_name = book.file_name.trim();

    if title.is_empty() && file_name.is_empty() {
        errors.push("Either title or filename is required".to_string());
    }

    if !file_name.is_empty() {
        if !has_document_extension(file_name) {
            errors.push(format!(
                "Filename must end in a document extension ({})",
                DOCUMENT_EXTENSIONS.join(", ")
            ));
        }
        if file_name.chars().count() > MAX_FILE_NAME_LEN {
            errors.push(format!(
                "Filename must be {MAX_FILE_NAME_LEN} characters or less"
            ));
        }
    }

    if title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!("Title must be {MAX_TITLE_LEN} characters or less"));
    }

    check_id("Category ID", book.category_id, &mut errors);
    check_id("Subject ID", book.subject_id, &mut errors);

    if book.rating.is_some_and(|r| !(0..=MAX_RATING).contains(&r)) {
        errors.push(format!("Rating must be between 0 and {MAX_RATING}"));
    }

    errors
}

fn check_name(label: &str, name: &str, errors: &mut Vec<String>) {
    let name = name.trim();
    if name.is_empty() {
        errors.push(format!("{label} name is required"));
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.push(format!(
            "{label} name must be {MAX_NAME_LEN} characters or less"
        ));
    }
}

fn check_id(label: &str, id: Option<i64>, errors: &mut Vec<String>) {
    if id.is_some_and(|id| id < 1) {
        errors.push(format!("{label} must be a positive integer"));
    }
}
