//! One-time conversion of the flat book layout to the relational one.
//!
//! Early catalogs stored the category and subject as text columns on each
//! book row. This creates the `categories`/`subjects` rows those strings
//! name and links every book to them by id. The text columns are left in
//! place.

use bookshelf_catalog::normalize::normalize_text;
use rusqlite::{params, Connection};

use crate::operations::{insert_category, insert_subject};
use crate::queries::QueryError;
use crate::schema::{create_schema, quote_ident, BookSchema};

/// What a flat-schema normalization changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlatImportStats {
    /// False when `books` had no text category column to convert.
    pub flat_layout_found: bool,
    pub categories_created: usize,
    pub subjects_created: usize,
    pub books_linked: usize,
}

/// Convert text category/subject columns into linked rows.
///
/// Idempotent: existing categories and subjects are reused and only books
/// without a `category_id` are touched.
pub fn normalize_flat_schema(conn: &Connection) -> Result<FlatImportStats, QueryError> {
    let schema = BookSchema::probe(conn)?;
    let Some(category_col) = schema.flat_category.clone() else {
        log::info!("books has no text category column; nothing to normalize");
        return Ok(FlatImportStats::default());
    };
    let mut stats = FlatImportStats {
        flat_layout_found: true,
        ..FlatImportStats::default()
    };

    if schema.category_id.is_none() {
        conn.execute_batch("ALTER TABLE books ADD COLUMN category_id INTEGER;")?;
    }
    if schema.subject_id.is_none() {
        conn.execute_batch("ALTER TABLE books ADD COLUMN subject_id INTEGER;")?;
    }
    create_schema(conn)?;

    let categories_before = count(conn, "categories")?;
    let subjects_before = count(conn, "subjects")?;

    let category_col = quote_ident(&category_col);
    let subject_col = schema.flat_subject.as_deref().map(quote_ident);
    let subject_expr = subject_col.as_deref().unwrap_or("NULL");

    let pairs: Vec<(String, Option<String>)> = {
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {category_col}, {subject_expr} FROM books
             WHERE {category_col} IS NOT NULL AND category_id IS NULL"
        ))?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    for (raw_category, raw_subject) in pairs {
        let category = normalize_text(&raw_category);
        if category.is_empty() {
            continue;
        }
        let category_id = insert_category(conn, &category)?;
        let subject_id = match raw_subject.as_deref().map(normalize_text) {
            Some(subject) if !subject.is_empty() => Some(insert_subject(conn, category_id, &subject)?),
            _ => None,
        };

        let subject_match = match &subject_col {
            Some(col) => format!("{col} IS ?4"),
            None => "?4 IS NULL".to_string(),
        };
        stats.books_linked += conn.execute(
            &format!(
                "UPDATE books SET category_id = ?1, subject_id = ?2
                 WHERE category_id IS NULL AND {category_col} = ?3 AND {subject_match}"
            ),
            params![category_id, subject_id, raw_category, raw_subject],
        )?;
    }

    stats.categories_created = (count(conn, "categories")? - categories_before).max(0) as usize;
    stats.subjects_created = (count(conn, "subjects")? - subjects_before).max(0) as usize;

    log::info!(
        "Normalized flat schema: {} categories, {} subjects created, {} books linked",
        stats.categories_created,
        stats.subjects_created,
        stats.books_linked
    );
    Ok(stats)
}

fn count(conn: &Connection, table: &str) -> Result<i64, QueryError> {
    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?)
}
