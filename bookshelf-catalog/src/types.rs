//! Data model types for the library catalog.
//!
//! These types represent the catalog hierarchy (categories own subjects,
//! subjects own books) plus the search and statistics values exchanged with
//! the query layer.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_key, normalize_text};

/// Label used when a book has no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Highest rating a book can carry. Ratings are whole stars in `0..=MAX_RATING`.
pub const MAX_RATING: i64 = 5;

// ── Category ────────────────────────────────────────────────────────────────

/// A top-level grouping of books (e.g. "Programming").
///
/// Equality and hashing are case-insensitive on the normalized name; ids are
/// ignored so a category read from storage compares equal to one typed by a
/// user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    /// Number of books filed under this category. Derived by the query, never stored.
    #[serde(default)]
    pub book_count: Option<i64>,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: normalize_text(name),
            book_count: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_book_count(mut self, count: i64) -> Self {
        self.book_count = Some(count);
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Name with the book count appended, e.g. `"Programming (12)"`.
    pub fn display_name(&self) -> String {
        match self.book_count {
            Some(count) => format!("{} ({})", self.name, count),
            None => self.name.clone(),
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        normalize_key(&self.name) == normalize_key(&other.name)
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        normalize_key(&self.name).hash(state);
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ── Subject ─────────────────────────────────────────────────────────────────

/// A subdivision of exactly one category (e.g. "Python" under "Programming").
///
/// The owning category is enforced by the storage join, not here: a subject
/// built by hand may carry no category at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subject {
    pub id: Option<i64>,
    pub category_id: Option<i64>,
    pub name: String,
    /// Owning category's display name.
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub book_count: Option<i64>,
}

impl Subject {
    pub fn new(name: &str, category_id: Option<i64>) -> Self {
        Self {
            id: None,
            category_id,
            name: normalize_text(name),
            category_name: String::new(),
            book_count: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_category_name(mut self, category_name: &str) -> Self {
        self.category_name = normalize_text(category_name);
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_category(&self) -> bool {
        self.category_id.is_some_and(|id| id > 0)
    }

    /// `"Programming → Python"`, or just the subject name without a category.
    pub fn full_name(&self) -> String {
        if self.category_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} → {}", self.category_name, self.name)
        }
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        normalize_key(&self.name) == normalize_key(&other.name)
            && self.category_id == other.category_id
    }
}

impl Eq for Subject {}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        normalize_key(&self.name).hash(state);
        self.category_id.hash(state);
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ── Book ────────────────────────────────────────────────────────────────────

/// A single document in the library.
///
/// The catalog is filename-addressed: two `Book`s are equal when their file
/// names match case-insensitively, whatever their numeric ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub file_name: String,
    /// Explicit on-disk location. Empty when the path follows the books-dir convention.
    pub file_path: String,
    pub category_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub category_name: String,
    pub subject_name: String,
    pub thumbnail_path: String,
    pub file_size: Option<u64>,
    pub rating: Option<i64>,
    pub last_opened: Option<NaiveDateTime>,
}

impl Book {
    /// Normalize every display field in place and return the book.
    pub fn normalized(mut self) -> Self {
        self.title = normalize_text(&self.title);
        self.author = normalize_text(&self.author);
        self.file_name = normalize_text(&self.file_name);
        self.category_name = normalize_text(&self.category_name);
        self.subject_name = normalize_text(&self.subject_name);
        self
    }

    /// A book needs at least a title or a file name.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() || !self.file_name.trim().is_empty()
    }

    pub fn has_category(&self) -> bool {
        self.category_id.is_some_and(|id| id > 0)
    }

    pub fn has_subject(&self) -> bool {
        self.subject_id.is_some_and(|id| id > 0)
    }

    /// Lower-cased file name used for identity.
    pub fn identity_key(&self) -> String {
        self.file_name.to_lowercase()
    }

    /// Title for display, falling back to the file stem.
    pub fn display_title(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown Title".to_string())
    }

    /// `"Category → Subject"`, whichever half is known, or [`UNCATEGORIZED`].
    pub fn category_subject_display(&self) -> String {
        match (self.category_name.is_empty(), self.subject_name.is_empty()) {
            (false, false) => format!("{} → {}", self.category_name, self.subject_name),
            (false, true) => self.category_name.clone(),
            (true, false) => self.subject_name.clone(),
            (true, true) => UNCATEGORIZED.to_string(),
        }
    }

    pub fn file_size_display(&self) -> String {
        match self.file_size {
            Some(bytes) if bytes > 0 => {
                let mb = bytes as f64 / (1024.0 * 1024.0);
                if mb < 1.0 {
                    format!("{:.0} KB", mb * 1024.0)
                } else {
                    format!("{:.1} MB", mb)
                }
            }
            _ => "Unknown size".to_string(),
        }
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.identity_key() == other.identity_key()
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity_key().hash(state);
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_title())
    }
}

// ── Search Criteria ─────────────────────────────────────────────────────────

/// Column a search result list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Title,
    Author,
    Category,
    Subject,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Category => "category",
            Self::Subject => "subject",
        }
    }

    /// Unknown names sort by title.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "author" => Self::Author,
            "category" => Self::Category,
            "subject" => Self::Subject,
            _ => Self::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Anything other than "asc" is treated as descending.
    pub fn from_str_loose(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Composite filter for [`SearchResult`]-producing queries. Every part is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub search_text: String,
    pub search_title: bool,
    pub search_author: bool,
    pub search_subject: bool,
    pub search_keywords: bool,
    pub search_description: bool,

    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub subjects: Vec<String>,

    pub min_rating: i64,
    pub max_rating: i64,

    pub sort_by: SortField,
    pub sort_order: SortOrder,

    pub limit: Option<u32>,
    pub offset: u32,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            search_title: true,
            search_author: true,
            search_subject: true,
            search_keywords: true,
            search_description: false,
            categories: Vec::new(),
            authors: Vec::new(),
            subjects: Vec::new(),
            min_rating: 0,
            max_rating: MAX_RATING,
            sort_by: SortField::Title,
            sort_order: SortOrder::Asc,
            limit: None,
            offset: 0,
        }
    }
}

impl SearchCriteria {
    /// Criteria matching on free text with the default field toggles.
    pub fn text(term: &str) -> Self {
        Self {
            search_text: term.to_string(),
            ..Self::default()
        }
    }

    /// True when no filter would narrow the result set.
    ///
    /// Blank entries in the value lists do not count as filters.
    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty()
            && !has_value(&self.categories)
            && !has_value(&self.authors)
            && !has_value(&self.subjects)
            && !self.has_rating_filter()
    }

    /// True when the rating bounds are narrower than the full `0..=5` range.
    pub fn has_rating_filter(&self) -> bool {
        self.min_rating > 0 || self.max_rating < MAX_RATING
    }

    /// Human-readable summary of the active filters.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.search_text.trim().is_empty() {
            parts.push(format!("Text: '{}'", self.search_text.trim()));
        }
        if has_value(&self.categories) {
            parts.push(format!("Categories: {}", self.categories.join(", ")));
        }
        if has_value(&self.authors) {
            parts.push(format!("Authors: {}", self.authors.join(", ")));
        }
        if has_value(&self.subjects) {
            parts.push(format!("Subjects: {}", self.subjects.join(", ")));
        }
        if self.has_rating_filter() {
            parts.push(format!("Rating: {}-{}", self.min_rating, self.max_rating));
        }
        if parts.is_empty() {
            "No filters active".to_string()
        } else {
            parts.join("; ")
        }
    }
}

fn has_value(values: &[String]) -> bool {
    values.iter().any(|v| !v.trim().is_empty())
}

// ── Search Result ───────────────────────────────────────────────────────────

/// Books found by a search plus bookkeeping about the search itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub books: Vec<Book>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub success: bool,
    pub error_message: String,
}

impl SearchResult {
    /// Successful result whose counts equal the number of books.
    pub fn new(books: Vec<Book>) -> Self {
        Self::with_counts(books, None, None)
    }

    /// Successful result; counts left as `None` default to `books.len()`.
    pub fn with_counts(
        books: Vec<Book>,
        total_count: Option<usize>,
        filtered_count: Option<usize>,
    ) -> Self {
        let len = books.len();
        Self {
            books,
            total_count: total_count.unwrap_or(len),
            filtered_count: filtered_count.unwrap_or(len),
            success: true,
            error_message: String::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            books: Vec::new(),
            total_count: 0,
            filtered_count: 0,
            success: false,
            error_message: message.into(),
        }
    }

    pub fn has_results(&self) -> bool {
        !self.books.is_empty()
    }

    pub fn summary(&self) -> String {
        if !self.success {
            return format!("Search failed: {}", self.error_message);
        }
        if !self.has_results() {
            return "No books found".to_string();
        }
        if self.filtered_count == self.total_count {
            format!("Found {} books", self.total_count)
        } else {
            format!("Found {} of {} books", self.filtered_count, self.total_count)
        }
    }
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Library-wide counters, computed on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryStatistics {
    pub total_books: usize,
    pub total_categories: usize,
    pub total_subjects: usize,
    pub total_authors: usize,
    /// Size of the currently filtered book list.
    pub current_book_count: usize,
    /// Books per category name; books without a category count as [`UNCATEGORIZED`].
    pub category_distribution: BTreeMap<String, usize>,
    pub largest_category: Option<(String, usize)>,
    /// Mean of ratings above zero, if any book is rated.
    pub average_rating: Option<f64>,
    pub books_with_thumbnails: usize,
}

impl LibraryStatistics {
    pub fn summary(&self) -> String {
        format!(
            "{} books, {} authors, {} categories",
            self.total_books, self.total_authors, self.total_categories
        )
    }
}
