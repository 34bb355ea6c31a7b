//! [`CatalogDb`]: the degrading query facade used by the service layer.
//!
//! Opening is strict: a missing, unreadable, or table-less database is a
//! [`DbError`]. After that every query degrades instead of failing. Errors are
//! logged at error level and the caller gets an empty list or `None`.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bookshelf_catalog::types::{Book, Category, SearchCriteria, Subject};
use rusqlite::Connection;
use thiserror::Error;

use crate::diagnostics::{self, DatabaseStats};
use crate::operations;
use crate::queries::{self, QueryError};
use crate::schema::{self, BookSchema, SchemaError};
use crate::search;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Failed to read books table layout: {0}")]
    Probe(#[from] rusqlite::Error),
}

/// An open catalog database and the probed layout of its `books` table.
pub struct CatalogDb {
    conn: Connection,
    path: Option<PathBuf>,
    schema: BookSchema,
    queries: Cell<u64>,
}

impl CatalogDb {
    /// Open an existing catalog database file.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = schema::open_database(path).inspect_err(|e| {
            log::error!("Cannot open catalog database {}: {}", path.display(), e);
        })?;
        let mut db = Self::from_connection(conn)?;
        db.path = Some(path.to_path_buf());
        log::info!("Opened catalog database {}", path.display());
        Ok(db)
    }

    /// Wrap an already-open connection, e.g. from [`schema::open_memory`].
    pub fn from_connection(conn: Connection) -> Result<Self, DbError> {
        if schema::count_tables(&conn)? == 0 {
            return Err(SchemaError::Empty(":memory:".to_string()).into());
        }
        let schema = BookSchema::probe(&conn)?;
        let missing = schema.missing_optional();
        if !missing.is_empty() {
            log::debug!("books table lacks optional columns {:?}", missing);
        }
        if !schema.is_relational() && schema.flat_category.is_some() {
            log::warn!(
                "books uses text category/subject columns; run normalize-flat to browse by category"
            );
        }
        Ok(Self {
            conn,
            path: None,
            schema,
            queries: Cell::new(0),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema(&self) -> &BookSchema {
        &self.schema
    }

    /// Probe the `books` columns again after an external schema change.
    pub fn refresh_schema(&mut self) {
        match BookSchema::probe(&self.conn) {
            Ok(schema) => self.schema = schema,
            Err(e) => log::error!("Failed to re-probe books table: {}", e),
        }
    }

    /// Number of catalog operations issued against the database so far.
    pub fn query_count(&self) -> u64 {
        self.queries.get()
    }

    fn run<T: Default>(
        &self,
        what: &str,
        op: impl FnOnce(&Connection, &BookSchema) -> Result<T, QueryError>,
    ) -> T {
        self.queries.set(self.queries.get() + 1);
        match op(&self.conn, &self.schema) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Error {}: {}", what, e);
                T::default()
            }
        }
    }

    // ── Categories / Subjects ───────────────────────────────────────────────

    pub fn get_all_categories(&self) -> Vec<Category> {
        self.run("getting categories", |conn, _| queries::all_categories(conn))
    }

    pub fn get_category_by_id(&self, id: i64) -> Option<Category> {
        self.run("getting category by id", |conn, _| {
            queries::category_by_id(conn, id)
        })
    }

    pub fn get_category_by_name(&self, name: &str) -> Option<Category> {
        self.run("getting category by name", |conn, _| {
            queries::category_by_name(conn, name)
        })
    }

    pub fn get_subjects_by_category(&self, category: &str) -> Vec<Subject> {
        self.run("getting subjects by category", |conn, _| {
            queries::subjects_by_category(conn, category)
        })
    }

    pub fn get_subject_by_id(&self, id: i64) -> Option<Subject> {
        self.run("getting subject by id", |conn, _| {
            queries::subject_by_id(conn, id)
        })
    }

    pub fn get_all_subjects(&self) -> Vec<Subject> {
        self.run("getting subjects", |conn, _| queries::all_subjects(conn))
    }

    /// Subjects per category (keyed by lower-cased name) with book counts.
    pub fn get_category_subject_map(&self) -> BTreeMap<String, Vec<Subject>> {
        self.run("building category subject map", |conn, _| {
            queries::category_subject_map(conn)
        })
    }

    // ── Books ───────────────────────────────────────────────────────────────

    pub fn get_all_books(&self) -> Vec<Book> {
        self.run("getting all books", queries::all_books)
    }

    pub fn get_books_by_subject(&self, subject: &str) -> Vec<Book> {
        self.run("getting books by subject", |conn, schema| {
            queries::books_by_subject(conn, schema, subject)
        })
    }

    pub fn get_books_by_category_subject(&self, category: &str, subject: &str) -> Vec<Book> {
        self.run("getting books by category and subject", |conn, schema| {
            queries::books_by_category_subject(conn, schema, category, subject)
        })
    }

    pub fn search_books(&self, text: &str) -> Vec<Book> {
        self.run("searching books", |conn, schema| {
            queries::search_books(conn, schema, text)
        })
    }

    pub fn search_books_with_criteria(&self, criteria: &SearchCriteria) -> Vec<Book> {
        self.run("searching books with criteria", |conn, schema| {
            search::search_with_criteria(conn, schema, criteria)
        })
    }

    pub fn get_book_by_id(&self, id: i64) -> Option<Book> {
        self.run("getting book by id", |conn, schema| {
            queries::book_by_id(conn, schema, id)
        })
    }

    pub fn get_book_by_title(&self, title: &str) -> Option<Book> {
        self.run("getting book by title", |conn, schema| {
            queries::book_by_title(conn, schema, title)
        })
    }

    pub fn get_all_authors(&self) -> Vec<String> {
        self.run("getting authors", queries::all_authors)
    }

    /// Stamp `last_opened` for a title. Failures are logged and swallowed.
    pub fn update_last_opened(&self, title: &str) {
        self.run("updating last opened", |conn, schema| {
            operations::touch_last_opened(conn, schema, title).map(|_| ())
        })
    }

    // ── Diagnostics ─────────────────────────────────────────────────────────

    pub fn validate_database(&self) -> Vec<String> {
        self.queries.set(self.queries.get() + 1);
        diagnostics::validate_database(&self.conn)
    }

    pub fn get_database_stats(&self) -> DatabaseStats {
        self.run("getting database stats", |conn, _| {
            diagnostics::database_stats(conn)
        })
    }
}
