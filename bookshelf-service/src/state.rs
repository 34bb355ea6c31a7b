//! Snapshots of service state handed to observers and callers.

use std::path::PathBuf;

/// The active filters and the size of the list they produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<String>,
    pub subject: Option<String>,
    pub search_term: String,
    pub book_count: usize,
    pub has_active_filters: bool,
}

impl FilterState {
    /// One-line description, e.g. `Programming → Python, search 'rust' (3 books)`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        match (&self.category, &self.subject) {
            (Some(category), Some(subject)) => parts.push(format!("{category} → {subject}")),
            (Some(category), None) => parts.push(category.clone()),
            (None, Some(subject)) => parts.push(subject.clone()),
            (None, None) => {}
        }
        if !self.search_term.is_empty() {
            parts.push(format!("search '{}'", self.search_term));
        }
        if parts.is_empty() {
            parts.push("No filters".to_string());
        }
        format!("{} ({} books)", parts.join(", "), self.book_count)
    }
}

/// A book whose file could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFile {
    pub title: String,
    pub expected_path: PathBuf,
}

/// Result of checking the current book list against the filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileValidation {
    pub total_books: usize,
    pub valid_files: usize,
    pub missing: Vec<MissingFile>,
}

impl FileValidation {
    pub fn missing_files(&self) -> usize {
        self.missing.len()
    }

    pub fn all_present(&self) -> bool {
        self.missing.is_empty()
    }
}
