//! Tolerant row mapping.
//!
//! Result columns are looked up by name, not position. A column that is
//! absent from the result, NULL, or of an unexpected storage class yields
//! the field's default instead of an error, so one odd row never aborts a
//! whole listing.

use std::collections::HashMap;
use std::path::Path;

use bookshelf_catalog::types::{Book, Category, Subject};
use chrono::NaiveDateTime;
use rusqlite::types::ValueRef;
use rusqlite::{Row, Statement};

/// Timestamp layouts accepted for `last_opened`, most common first.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Book fields that may be missing from a result without affecting the others.
const OPTIONAL_BOOK_FIELDS: &[&str] = &[
    "author",
    "file_name",
    "file_path",
    "thumbnail_path",
    "file_size",
    "rating",
    "last_opened",
    "category",
    "subject",
];

/// Name-to-index map of a prepared statement's result columns.
#[derive(Debug, Clone)]
pub struct RowColumns {
    index: HashMap<String, usize>,
}

impl RowColumns {
    /// Capture the column names before the statement is borrowed for querying.
    pub fn from_statement(stmt: &Statement<'_>) -> Self {
        let index = stmt
            .column_names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_lowercase(), i))
            .collect();
        Self { index }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    fn get(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_lowercase()).copied()
    }

    /// Column `name` as text. Integers and reals are rendered; blobs are ignored.
    pub fn text(&self, row: &Row<'_>, name: &str) -> Option<String> {
        let idx = self.get(name)?;
        match row.get_ref(idx) {
            Ok(ValueRef::Text(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Ok(ValueRef::Integer(i)) => Some(i.to_string()),
            Ok(ValueRef::Real(f)) => Some(f.to_string()),
            Ok(ValueRef::Null) => None,
            Ok(ValueRef::Blob(_)) => {
                log::debug!("Column '{}' holds a blob, ignoring", name);
                None
            }
            Err(e) => {
                log::debug!("Column '{}' unreadable: {}", name, e);
                None
            }
        }
    }

    /// Column `name` as an integer. Numeric text is parsed; anything else is `None`.
    pub fn integer(&self, row: &Row<'_>, name: &str) -> Option<i64> {
        let idx = self.get(name)?;
        match row.get_ref(idx) {
            Ok(ValueRef::Integer(i)) => Some(i),
            Ok(ValueRef::Real(f)) => Some(f as i64),
            Ok(ValueRef::Text(bytes)) => {
                let parsed = std::str::from_utf8(bytes).ok()?.trim().parse().ok();
                if parsed.is_none() {
                    log::debug!("Column '{}' is not numeric, ignoring", name);
                }
                parsed
            }
            Ok(ValueRef::Null) | Ok(ValueRef::Blob(_)) => None,
            Err(e) => {
                log::debug!("Column '{}' unreadable: {}", name, e);
                None
            }
        }
    }
}

// ── Book Mapping ────────────────────────────────────────────────────────────

/// Maps rows of a book `SELECT` to [`Book`]s.
#[derive(Debug, Clone)]
pub struct RowMapper {
    columns: RowColumns,
    missing: Vec<&'static str>,
}

impl RowMapper {
    pub fn new(stmt: &Statement<'_>) -> Self {
        let columns = RowColumns::from_statement(stmt);
        let missing: Vec<&'static str> = OPTIONAL_BOOK_FIELDS
            .iter()
            .copied()
            .filter(|f| !columns.contains(f))
            .collect();
        if !missing.is_empty() {
            log::debug!("Book query lacks columns {:?}, using defaults", missing);
        }
        Self { columns, missing }
    }

    /// Optional book fields absent from this result set.
    pub fn missing_fields(&self) -> &[&'static str] {
        &self.missing
    }

    pub fn map(&self, row: &Row<'_>) -> rusqlite::Result<Book> {
        let c = &self.columns;
        let title = c.text(row, "title").unwrap_or_default();
        let file_path = c.text(row, "file_path").unwrap_or_default();
        let file_name = c
            .text(row, "file_name")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| file_name_of(&file_path))
            .unwrap_or_else(|| derived_file_name(&title));

        let book = Book {
            id: c.integer(row, "id"),
            title,
            author: c.text(row, "author").unwrap_or_default(),
            file_name,
            file_path,
            category_id: c.integer(row, "category_id"),
            subject_id: c.integer(row, "subject_id"),
            category_name: c.text(row, "category").unwrap_or_default(),
            subject_name: c.text(row, "subject").unwrap_or_default(),
            thumbnail_path: c.text(row, "thumbnail_path").unwrap_or_default(),
            file_size: c
                .integer(row, "file_size")
                .and_then(|n| u64::try_from(n).ok()),
            rating: c.integer(row, "rating"),
            last_opened: c.text(row, "last_opened").and_then(|s| parse_timestamp(&s)),
        };
        Ok(book.normalized())
    }
}

/// File name implied by a stored path, if it has one.
fn file_name_of(path: &str) -> Option<String> {
    if path.trim().is_empty() {
        return None;
    }
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

/// Legacy rows carry no file name at all; the file was `<title>.pdf`.
fn derived_file_name(title: &str) -> String {
    if title.trim().is_empty() {
        String::new()
    } else {
        format!("{}.pdf", title.trim())
    }
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

// ── Category / Subject Mapping ──────────────────────────────────────────────

/// Expects `id`, `category` and optionally `book_count`.
pub fn row_to_category(columns: &RowColumns, row: &Row<'_>) -> rusqlite::Result<Category> {
    let mut category = Category::new(&columns.text(row, "category").unwrap_or_default());
    category.id = columns.integer(row, "id");
    category.book_count = columns.integer(row, "book_count");
    Ok(category)
}

/// Expects `id`, `category_id`, `subject`, and optionally `category` and `book_count`.
pub fn row_to_subject(columns: &RowColumns, row: &Row<'_>) -> rusqlite::Result<Subject> {
    let mut subject = Subject::new(
        &columns.text(row, "subject").unwrap_or_default(),
        columns.integer(row, "category_id"),
    )
    .with_category_name(&columns.text(row, "category").unwrap_or_default());
    subject.id = columns.integer(row, "id");
    subject.book_count = columns.integer(row, "book_count");
    Ok(subject)
}
