//! SQLite schema creation, opening, and column probing.
//!
//! Catalog databases in the wild come from several generations of import
//! scripts, so nothing here assumes a column exists beyond `books.id` and
//! `books.title`. [`BookSchema::probe`] records which optional columns the
//! `books` table actually has, under whatever case the deployment chose.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database not found: {0}")]
    NotFound(String),
    #[error("Database appears to be empty (no tables found): {0}")]
    Empty(String),
}

/// Tables every catalog needs.
pub const REQUIRED_TABLES: &[&str] = &["categories", "subjects", "books"];

/// Create all tables and indexes if they don't exist.
///
/// Idempotent; safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Open an existing catalog database.
///
/// Unlike [`create_database`] this never creates a file: a missing path or
/// a file without any tables is an error, since there is no catalog to
/// browse.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    if !path.is_file() {
        return Err(SchemaError::NotFound(path.display().to_string()));
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    if count_tables(&conn)? == 0 {
        return Err(SchemaError::Empty(path.display().to_string()));
    }

    Ok(conn)
}

/// Open or create a catalog database at the given path with the full schema.
pub fn create_database(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Number of user tables in the database.
pub fn count_tables(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )
}

pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name = ?1 COLLATE NOCASE)",
        [table],
        |row| row.get(0),
    )
}

/// Column names of `table` as declared. Empty if the table doesn't exist.
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    rows.collect()
}

/// Double-quote an identifier for interpolation into SQL.
///
/// Only ever applied to names read back from the database's own catalog.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn find_column(columns: &[String], candidates: &[&str]) -> Option<String> {
    columns
        .iter()
        .find(|c| candidates.iter().any(|cand| c.eq_ignore_ascii_case(cand)))
        .cloned()
}

// ── Book column probe ───────────────────────────────────────────────────────

/// Optional `books` columns present in this database, by their declared names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSchema {
    pub author: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub file_size: Option<String>,
    pub rating: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_opened: Option<String>,
    pub category_id: Option<String>,
    pub subject_id: Option<String>,
    /// Text category/subject columns of the flat (pre-relational) layout.
    pub flat_category: Option<String>,
    pub flat_subject: Option<String>,
}

impl BookSchema {
    /// Read `PRAGMA table_info(books)` and record which optional columns exist.
    pub fn probe(conn: &Connection) -> rusqlite::Result<Self> {
        let columns = table_columns(conn, "books")?;
        Ok(Self::from_columns(&columns))
    }

    pub fn from_columns(columns: &[String]) -> Self {
        Self {
            author: find_column(columns, &["author"]),
            file_name: find_column(columns, &["FileName", "file_name"]),
            file_path: find_column(columns, &["FilePath", "file_path"]),
            thumbnail_path: find_column(columns, &["ThumbnailPath", "thumbnail_path"]),
            file_size: find_column(columns, &["FileSize", "file_size"]),
            rating: find_column(columns, &["rating"]),
            keywords: find_column(columns, &["keywords"]),
            description: find_column(columns, &["description"]),
            last_opened: find_column(columns, &["last_opened", "LastOpened"]),
            category_id: find_column(columns, &["category_id"]),
            subject_id: find_column(columns, &["subject_id"]),
            flat_category: find_column(columns, &["category"]),
            flat_subject: find_column(columns, &["subject"]),
        }
    }

    /// True when books link to categories/subjects by id.
    pub fn is_relational(&self) -> bool {
        self.category_id.is_some() && self.subject_id.is_some()
    }

    /// Names of the optional display columns this database lacks.
    pub fn missing_optional(&self) -> Vec<&'static str> {
        [
            ("author", &self.author),
            ("FileName", &self.file_name),
            ("FilePath", &self.file_path),
            ("ThumbnailPath", &self.thumbnail_path),
            ("FileSize", &self.file_size),
            ("rating", &self.rating),
            ("last_opened", &self.last_opened),
        ]
        .into_iter()
        .filter(|(_, col)| col.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Expression for a book's category name.
    ///
    /// The joined `categories` row for the relational layout, the text column
    /// for the flat one, `None` when the table carries neither.
    pub fn category_name_expr(&self) -> Option<String> {
        if self.is_relational() {
            Some("c.category".to_string())
        } else {
            Self::column_expr(&self.flat_category)
        }
    }

    /// Expression for a book's subject name. See [`Self::category_name_expr`].
    pub fn subject_name_expr(&self) -> Option<String> {
        if self.is_relational() {
            Some("s.subject".to_string())
        } else {
            Self::column_expr(&self.flat_subject)
        }
    }

    /// `SELECT ... FROM books b LEFT JOIN categories c ... LEFT JOIN subjects s ...`
    ///
    /// Only present optional columns are selected, each aliased to a
    /// canonical name the row mapper looks for. Flat-layout tables are read
    /// without the joins, taking names from their text columns.
    pub fn select_books_sql(&self) -> String {
        let mut cols = vec!["b.id AS id".to_string(), "b.title AS title".to_string()];
        let optional = [
            (&self.author, "author"),
            (&self.file_name, "file_name"),
            (&self.file_path, "file_path"),
            (&self.thumbnail_path, "thumbnail_path"),
            (&self.file_size, "file_size"),
            (&self.rating, "rating"),
            (&self.last_opened, "last_opened"),
        ];
        for (column, alias) in optional {
            if let Some(name) = column {
                cols.push(format!("b.{} AS {}", quote_ident(name), alias));
            }
        }
        let null = || "NULL".to_string();
        cols.push(format!(
            "{} AS category_id",
            Self::column_expr(&self.category_id).unwrap_or_else(null)
        ));
        cols.push(format!(
            "{} AS subject_id",
            Self::column_expr(&self.subject_id).unwrap_or_else(null)
        ));
        cols.push(format!(
            "{} AS category",
            self.category_name_expr().unwrap_or_else(null)
        ));
        cols.push(format!(
            "{} AS subject",
            self.subject_name_expr().unwrap_or_else(null)
        ));

        if self.is_relational() {
            format!(
                "SELECT {} FROM books b \
                 LEFT JOIN categories c ON b.category_id = c.id \
                 LEFT JOIN subjects s ON b.subject_id = s.id",
                cols.join(", ")
            )
        } else {
            format!("SELECT {} FROM books b", cols.join(", "))
        }
    }

    /// Qualified SQL expression for an optional column, e.g. `b."author"`.
    pub fn column_expr(column: &Option<String>) -> Option<String> {
        column.as_ref().map(|name| format!("b.{}", quote_ident(name)))
    }
}

/// Add any missing optional `books` columns. Returns the names added.
///
/// Existing columns are left alone whatever their case, so this is safe to
/// run repeatedly and against databases produced by older import scripts.
pub fn ensure_optional_columns(conn: &Connection) -> Result<Vec<&'static str>, SchemaError> {
    let columns = table_columns(conn, "books")?;
    let wanted: &[(&str, &[&str], &str)] = &[
        ("author", &["author"], "TEXT"),
        ("FileName", &["FileName", "file_name"], "TEXT"),
        ("FilePath", &["FilePath", "file_path"], "TEXT"),
        ("ThumbnailPath", &["ThumbnailPath", "thumbnail_path"], "TEXT"),
        ("FileSize", &["FileSize", "file_size"], "INTEGER"),
        ("rating", &["rating"], "INTEGER"),
        ("last_opened", &["last_opened", "LastOpened"], "TEXT"),
    ];

    let mut added = Vec::new();
    for (name, candidates, sql_type) in wanted {
        if find_column(&columns, candidates).is_none() {
            conn.execute_batch(&format!(
                "ALTER TABLE books ADD COLUMN {} {};",
                quote_ident(name),
                sql_type
            ))?;
            added.push(*name);
        }
    }
    Ok(added)
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS subjects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER REFERENCES categories(id),
    subject TEXT NOT NULL,
    UNIQUE(category_id, subject)
);
CREATE INDEX IF NOT EXISTS idx_subjects_category ON subjects(category_id);

CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author TEXT,
    category_id INTEGER REFERENCES categories(id),
    subject_id INTEGER REFERENCES subjects(id),
    FileName TEXT,
    FilePath TEXT,
    ThumbnailPath TEXT,
    FileSize INTEGER,
    rating INTEGER,
    keywords TEXT,
    description TEXT,
    last_opened TEXT
);
CREATE INDEX IF NOT EXISTS idx_books_subject ON books(subject_id);
CREATE INDEX IF NOT EXISTS idx_books_category ON books(category_id);
CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
"#;
