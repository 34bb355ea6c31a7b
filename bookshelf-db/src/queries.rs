//! Read queries for the catalog database.
//!
//! Book queries take a [`BookSchema`] so their select list only names
//! columns this database actually has.

use std::collections::BTreeMap;

use bookshelf_catalog::normalize::{normalize_key, normalize_text};
use bookshelf_catalog::types::*;
use rusqlite::{params, Connection, Params};
use thiserror::Error;

use crate::row::{row_to_category, row_to_subject, RowColumns, RowMapper};
use crate::schema::{BookSchema, SchemaError, quote_ident};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// ── Categories ──────────────────────────────────────────────────────────────

/// All categories with the number of books filed under each, by name.
pub fn all_categories(conn: &Connection) -> Result<Vec<Category>, QueryError> {
    query_categories(
        conn,
        "SELECT c.id AS id, c.category AS category, COUNT(b.id) AS book_count
         FROM categories c
         LEFT JOIN books b ON b.category_id = c.id
         GROUP BY c.id, c.category
         ORDER BY c.category COLLATE NOCASE",
        [],
    )
}

pub fn category_by_id(conn: &Connection, id: i64) -> Result<Option<Category>, QueryError> {
    let found = query_categories(
        conn,
        "SELECT id, category FROM categories WHERE id = ?1",
        params![id],
    )?;
    Ok(found.into_iter().next())
}

/// Case-insensitive lookup; surrounding and repeated whitespace is ignored.
pub fn category_by_name(conn: &Connection, name: &str) -> Result<Option<Category>, QueryError> {
    let found = query_categories(
        conn,
        "SELECT id, category FROM categories WHERE LOWER(category) = LOWER(?1) LIMIT 1",
        params![normalize_text(name)],
    )?;
    Ok(found.into_iter().next())
}

// ── Subjects ────────────────────────────────────────────────────────────────

/// Subjects belonging to the named category, by name.
pub fn subjects_by_category(conn: &Connection, category: &str) -> Result<Vec<Subject>, QueryError> {
    query_subjects(
        conn,
        "SELECT s.id AS id, s.category_id AS category_id, s.subject AS subject,
                c.category AS category
         FROM subjects s
         JOIN categories c ON s.category_id = c.id
         WHERE c.category = ?1 COLLATE NOCASE
         ORDER BY s.subject COLLATE NOCASE",
        params![normalize_text(category)],
    )
}

pub fn subject_by_id(conn: &Connection, id: i64) -> Result<Option<Subject>, QueryError> {
    let found = query_subjects(
        conn,
        "SELECT s.id AS id, s.category_id AS category_id, s.subject AS subject,
                c.category AS category
         FROM subjects s
         LEFT JOIN categories c ON s.category_id = c.id
         WHERE s.id = ?1",
        params![id],
    )?;
    Ok(found.into_iter().next())
}

pub fn all_subjects(conn: &Connection) -> Result<Vec<Subject>, QueryError> {
    query_subjects(
        conn,
        "SELECT s.id AS id, s.category_id AS category_id, s.subject AS subject,
                c.category AS category
         FROM subjects s
         LEFT JOIN categories c ON s.category_id = c.id
         ORDER BY c.category COLLATE NOCASE, s.subject COLLATE NOCASE",
        [],
    )
}

/// Every category's subjects with per-subject book counts, from one grouped query.
///
/// Keyed by the normalized (lower-cased) category name. Subjects within a
/// category are in the same order [`subjects_by_category`] returns them.
pub fn category_subject_map(
    conn: &Connection,
) -> Result<BTreeMap<String, Vec<Subject>>, QueryError> {
    let subjects = query_subjects(
        conn,
        "SELECT s.id AS id, c.id AS category_id, s.subject AS subject,
                c.category AS category, COUNT(b.id) AS book_count
         FROM categories c
         INNER JOIN subjects s ON s.category_id = c.id
         LEFT JOIN books b ON b.subject_id = s.id
         WHERE c.category IS NOT NULL AND s.subject IS NOT NULL
         GROUP BY c.category, s.subject
         ORDER BY c.category COLLATE NOCASE, s.subject COLLATE NOCASE",
        [],
    )?;

    let mut map: BTreeMap<String, Vec<Subject>> = BTreeMap::new();
    for subject in subjects {
        map.entry(normalize_key(&subject.category_name))
            .or_default()
            .push(subject);
    }
    Ok(map)
}

// ── Books ───────────────────────────────────────────────────────────────────

pub fn all_books(conn: &Connection, schema: &BookSchema) -> Result<Vec<Book>, QueryError> {
    let sql = format!("{} ORDER BY b.title COLLATE NOCASE", schema.select_books_sql());
    query_books(conn, &sql, [])
}

/// Books filed under any subject with this name, by title.
pub fn books_by_subject(
    conn: &Connection,
    schema: &BookSchema,
    subject: &str,
) -> Result<Vec<Book>, QueryError> {
    let Some(subject_expr) = schema.subject_name_expr() else {
        return Ok(Vec::new());
    };
    let sql = format!(
        "{} WHERE {subject_expr} = ?1 COLLATE NOCASE ORDER BY b.title COLLATE NOCASE",
        schema.select_books_sql()
    );
    query_books(conn, &sql, params![normalize_text(subject)])
}

/// Books filed under `subject` where that subject belongs to `category`.
///
/// Subject names are only unique within a category, so this is the lookup
/// to use whenever the category is known.
pub fn books_by_category_subject(
    conn: &Connection,
    schema: &BookSchema,
    category: &str,
    subject: &str,
) -> Result<Vec<Book>, QueryError> {
    let filter = if schema.is_relational() {
        "s.subject = ?2 COLLATE NOCASE
           AND s.category_id IN (SELECT id FROM categories WHERE category = ?1 COLLATE NOCASE)"
            .to_string()
    } else {
        match (schema.category_name_expr(), schema.subject_name_expr()) {
            (Some(category_expr), Some(subject_expr)) => format!(
                "{subject_expr} = ?2 COLLATE NOCASE AND {category_expr} = ?1 COLLATE NOCASE"
            ),
            _ => return Ok(Vec::new()),
        }
    };
    let sql = format!(
        "{} WHERE {filter} ORDER BY b.title COLLATE NOCASE",
        schema.select_books_sql()
    );
    query_books(
        conn,
        &sql,
        params![normalize_text(category), normalize_text(subject)],
    )
}

/// Case-insensitive title substring search.
pub fn search_books(
    conn: &Connection,
    schema: &BookSchema,
    text: &str,
) -> Result<Vec<Book>, QueryError> {
    let sql = format!(
        "{} WHERE b.title LIKE ?1 ESCAPE '\\' ORDER BY b.title COLLATE NOCASE",
        schema.select_books_sql()
    );
    query_books(conn, &sql, params![like_pattern(text.trim())])
}

pub fn book_by_id(
    conn: &Connection,
    schema: &BookSchema,
    id: i64,
) -> Result<Option<Book>, QueryError> {
    let sql = format!("{} WHERE b.id = ?1", schema.select_books_sql());
    Ok(query_books(conn, &sql, params![id])?.into_iter().next())
}

/// Exact title match. The first row wins if titles repeat.
pub fn book_by_title(
    conn: &Connection,
    schema: &BookSchema,
    title: &str,
) -> Result<Option<Book>, QueryError> {
    let sql = format!(
        "{} WHERE b.title = ?1 ORDER BY b.id LIMIT 1",
        schema.select_books_sql()
    );
    Ok(query_books(conn, &sql, params![title.trim()])?.into_iter().next())
}

/// Distinct non-blank authors, alphabetically. Empty without an author column.
pub fn all_authors(conn: &Connection, schema: &BookSchema) -> Result<Vec<String>, QueryError> {
    let Some(column) = &schema.author else {
        return Ok(Vec::new());
    };
    let col = quote_ident(column);
    let mut stmt = conn.prepare(&format!(
        "SELECT DISTINCT {col} FROM books
         WHERE {col} IS NOT NULL AND TRIM({col}) <> ''
         ORDER BY {col} COLLATE NOCASE"
    ))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut authors: Vec<String> = Vec::new();
    for author in rows {
        let author = normalize_text(&author?);
        if !authors.iter().any(|a| normalize_key(a) == normalize_key(&author)) {
            authors.push(author);
        }
    }
    Ok(authors)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// `%text%` with LIKE wildcards in `text` escaped by backslash.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub(crate) fn query_books<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Book>, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    let mapper = RowMapper::new(&stmt);
    let rows = stmt.query_map(params, |row| mapper.map(row))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn query_categories<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Category>, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    let columns = RowColumns::from_statement(&stmt);
    let rows = stmt.query_map(params, |row| row_to_category(&columns, row))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn query_subjects<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Subject>, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    let columns = RowColumns::from_statement(&stmt);
    let rows = stmt.query_map(params, |row| row_to_subject(&columns, row))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
